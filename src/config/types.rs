use serde::Deserialize;
use std::time::Duration;

/// Default Chrome launch arguments
pub const DEFAULT_BROWSER_ARGS: &[&str] = &["--disable-gpu", "--no-sandbox", "--lang=en-US"];

/// Main configuration structure for Tube-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub browser: BrowserSettings,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl engine limits
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of pages handled at the same time
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Cap on started requests; derived from the input's `max_videos` when unset
    #[serde(default)]
    pub max_requests_per_crawl: Option<u32>,

    /// How many times a failed request is put back in the queue
    #[serde(default = "default_max_request_retries")]
    pub max_request_retries: u32,

    /// Upper bound for opening a page (milliseconds)
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Upper bound for one page handler invocation (milliseconds)
    #[serde(default = "default_request_handler_timeout_ms")]
    pub request_handler_timeout_ms: u64,
}

impl CrawlerConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn request_handler_timeout(&self) -> Duration {
        Duration::from_millis(self.request_handler_timeout_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            max_requests_per_crawl: None,
            max_request_retries: default_max_request_retries(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            request_handler_timeout_ms: default_request_handler_timeout_ms(),
        }
    }
}

/// Browser launch settings
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// Run Chrome without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Extra command-line arguments for Chrome
    #[serde(default = "default_browser_args")]
    pub args: Vec<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            args: default_browser_args(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database holding the dataset and key-value store
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_max_concurrency() -> usize {
    1
}

fn default_max_request_retries() -> u32 {
    3
}

fn default_navigation_timeout_ms() -> u64 {
    60_000
}

fn default_request_handler_timeout_ms() -> u64 {
    600_000
}

fn default_headless() -> bool {
    true
}

fn default_browser_args() -> Vec<String> {
    DEFAULT_BROWSER_ARGS.iter().map(|a| a.to_string()).collect()
}

fn default_database_path() -> String {
    "./storage/tube-harvest.db".to_string()
}
