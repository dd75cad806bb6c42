//! Crawler module: the engine seam and everything around it
//!
//! This module contains:
//! - Crawl requests and their dedup key
//! - The browser page abstraction and its Chrome implementation
//! - The page handler trait and per-request context
//! - The queue engine and the orchestrator that drives it

mod chrome;
mod context;
mod engine;
mod handler;
mod orchestrator;
mod page;
mod request;

pub use chrome::{ChromePage, ChromeSource};
pub use context::CrawlContext;
pub use engine::{CrawlEngine, CrawlStats, EngineLimits, PageSource, QueueEngine};
pub use handler::PageHandler;
pub use orchestrator::{run_actor, Orchestrator, SCRAPED_COUNT_KEY};
pub use page::BrowserPage;
pub use request::{unique_key, CrawlRequest};
