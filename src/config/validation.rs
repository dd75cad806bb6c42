use crate::config::types::{BrowserSettings, Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;

/// Lower bound for every timeout setting
const MIN_TIMEOUT_MS: u64 = 1_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_browser_settings(&config.browser)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl engine limits
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrency < 1 || config.max_concurrency > 50 {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and 50, got {}",
            config.max_concurrency
        )));
    }

    if config.max_requests_per_crawl == Some(0) {
        return Err(ConfigError::Validation(
            "max_requests_per_crawl must be >= 1".to_string(),
        ));
    }

    if config.navigation_timeout_ms < MIN_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "navigation_timeout_ms must be >= {}ms, got {}ms",
            MIN_TIMEOUT_MS, config.navigation_timeout_ms
        )));
    }

    if config.request_handler_timeout_ms < MIN_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "request_handler_timeout_ms must be >= {}ms, got {}ms",
            MIN_TIMEOUT_MS, config.request_handler_timeout_ms
        )));
    }

    Ok(())
}

/// Validates browser launch settings
fn validate_browser_settings(settings: &BrowserSettings) -> Result<(), ConfigError> {
    for arg in &settings.args {
        if !arg.starts_with("--") {
            return Err(ConfigError::Validation(format!(
                "browser argument '{}' must start with '--'",
                arg
            )));
        }
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_crawler_limits() {
        let mut crawler = CrawlerConfig::default();
        crawler.max_concurrency = 51;
        assert!(validate_crawler_config(&crawler).is_err());

        let mut crawler = CrawlerConfig::default();
        crawler.max_requests_per_crawl = Some(0);
        assert!(validate_crawler_config(&crawler).is_err());

        let mut crawler = CrawlerConfig::default();
        crawler.navigation_timeout_ms = 500;
        assert!(validate_crawler_config(&crawler).is_err());

        let mut crawler = CrawlerConfig::default();
        crawler.request_handler_timeout_ms = 10;
        assert!(validate_crawler_config(&crawler).is_err());
    }

    #[test]
    fn test_validate_browser_args() {
        let settings = BrowserSettings {
            headless: true,
            args: vec!["no-sandbox".to_string()],
        };
        assert!(validate_browser_settings(&settings).is_err());
    }

    #[test]
    fn test_validate_output_config() {
        let output = OutputConfig {
            database_path: "  ".to_string(),
        };
        assert!(validate_output_config(&output).is_err());
    }
}
