//! Configuration module for Tube-Harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! run configuration. Every field has a default, so a missing file yields
//! [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use tube_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Concurrency: {}", config.crawler.max_concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BrowserSettings, Config, CrawlerConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
