//! Tube-Harvest: a headless-browser scraping task runner
//!
//! This crate reads a platform input object (seed URLs, optional YouTube
//! credentials), drives a Chrome-backed crawl of those URLs and stores the
//! records extracted by the page handler in a local dataset.

pub mod config;
pub mod credentials;
pub mod crawler;
pub mod input;
pub mod output;
pub mod scraping;
pub mod storage;

use thiserror::Error;

/// Main error type for Tube-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Crawl engine error: {0}")]
    Engine(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while loading the actor input
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read input file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse input JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid start URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Errors raised by the browser backend
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out after {timeout_ms}ms waiting for {what}")]
    Timeout { what: String, timeout_ms: u64 },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("DevTools protocol error: {0}")]
    Protocol(String),
}

/// Result type alias for Tube-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for browser operations
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

// Re-export commonly used types
pub use config::Config;
pub use credentials::{resolve_credentials, Credentials, EnvProvider, ProcessEnv, Secret};
pub use crawler::{run_actor, CrawlEngine, CrawlRequest, CrawlStats, Orchestrator, PageHandler};
pub use input::ActorInput;
