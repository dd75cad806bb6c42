//! Crawl orchestration
//!
//! [`Orchestrator`] binds a page handler to an injected engine and runs it
//! against the seed URLs. [`run_actor`] wires a complete run: input,
//! credentials, storage, Chrome and the YouTube channel handler.

use crate::config::Config;
use crate::credentials::{resolve_credentials, EnvProvider};
use crate::crawler::chrome::ChromeSource;
use crate::crawler::engine::{CrawlEngine, CrawlStats, EngineLimits, QueueEngine};
use crate::crawler::handler::PageHandler;
use crate::crawler::request::CrawlRequest;
use crate::input::ActorInput;
use crate::scraping::{ChannelHandler, ChannelOptions};
use crate::storage::{KeyValueStore, RunStatus, SqliteStore};
use crate::HarvestError;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

/// Key holding the number of records pushed by the last run
pub const SCRAPED_COUNT_KEY: &str = "scraped_videos_count";

/// Thin wrapper that seeds an engine and runs it to completion
pub struct Orchestrator {
    engine: Arc<dyn CrawlEngine>,
    handler: Arc<dyn PageHandler>,
}

impl Orchestrator {
    pub fn new(engine: Arc<dyn CrawlEngine>, handler: Arc<dyn PageHandler>) -> Self {
        Self { engine, handler }
    }

    /// Runs the engine over `seed_urls`
    ///
    /// Returns once the engine reports its queue drained, or with the
    /// engine's fatal error.
    pub async fn run(&self, seed_urls: &[String]) -> Result<CrawlStats, HarvestError> {
        let seeds: Vec<CrawlRequest> = seed_urls.iter().map(CrawlRequest::new).collect();
        tracing::info!("Starting crawl with {} seed URLs", seeds.len());

        let stats = self.engine.run(seeds, self.handler.clone()).await?;

        tracing::info!(
            "Crawl finished: {} requests, {} succeeded, {} failed, {} retries, {} records in {:?}",
            stats.requests_total,
            stats.requests_finished,
            stats.requests_failed,
            stats.requests_retried,
            stats.records_pushed,
            stats.duration
        );

        Ok(stats)
    }
}

/// Runs the actor end to end
///
/// # Steps
///
/// 1. Exit early if the input has no start URLs
/// 2. Resolve credentials (input, then environment)
/// 3. Open the result store, drop the previous run's results and record the run
/// 4. Launch Chrome and crawl with the channel handler
/// 5. Record the final counters and close the browser
///
/// # Example
///
/// ```no_run
/// use tube_harvest::config::Config;
/// use tube_harvest::credentials::ProcessEnv;
/// use tube_harvest::crawler::run_actor;
/// use tube_harvest::input::load_input;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let input = load_input(Path::new("storage/key_value_stores/default/INPUT.json"))?;
/// let stats = run_actor(&Config::default(), &input, &ProcessEnv).await?;
/// println!("{} records", stats.records_pushed);
/// # Ok(())
/// # }
/// ```
pub async fn run_actor(
    config: &Config,
    input: &ActorInput,
    env: &dyn EnvProvider,
) -> Result<CrawlStats, HarvestError> {
    let seeds = input.seed_urls();
    if seeds.is_empty() {
        tracing::info!("No start URLs specified in input, exiting...");
        return Ok(CrawlStats::default());
    }

    let credentials = resolve_credentials(input, env);
    if credentials.is_empty() {
        tracing::info!("No YouTube credentials configured, crawling unauthenticated");
    } else if !credentials.is_complete() {
        tracing::warn!("YouTube credentials are incomplete, sign-in will be skipped");
    } else {
        tracing::info!("YouTube credentials resolved");
    }

    let (store, run_id) = open_run_store(Path::new(&config.output.database_path))?;

    let source = match ChromeSource::launch(&config.browser).await {
        Ok(source) => Arc::new(source),
        Err(e) => {
            store.finish_run(run_id, RunStatus::Failed, 0, 0, 0)?;
            return Err(e.into());
        }
    };

    let limits = EngineLimits::from_config(&config.crawler, input.max_videos.saturating_add(1));
    let engine = Arc::new(QueueEngine::new(source.clone(), store.clone(), limits));
    let handler = Arc::new(ChannelHandler::new(
        ChannelOptions::from_input(input),
        Arc::new(credentials),
    ));

    let result = Orchestrator::new(engine, handler).run(&seeds).await;
    source.shutdown().await;

    match result {
        Ok(stats) => {
            store.set_value(SCRAPED_COUNT_KEY, &json!(stats.records_pushed))?;
            store.finish_run(
                run_id,
                RunStatus::Succeeded,
                stats.requests_finished,
                stats.requests_failed,
                stats.records_pushed,
            )?;
            Ok(stats)
        }
        Err(e) => {
            if let Err(storage_err) = store.finish_run(run_id, RunStatus::Failed, 0, 0, 0) {
                tracing::warn!("Failed to record run failure: {}", storage_err);
            }
            Err(e)
        }
    }
}

/// Opens the result store for a new run
///
/// Results of earlier runs are removed so the dataset and the key-value
/// store only ever describe the latest run; the run history is kept.
fn open_run_store(path: &Path) -> Result<(Arc<SqliteStore>, i64), HarvestError> {
    let store = Arc::new(SqliteStore::new(path)?);
    store.clear_results()?;
    let run_id = store.begin_run()?;
    store.set_value(SCRAPED_COUNT_KEY, &json!(0))?;
    Ok((store, run_id))
}
