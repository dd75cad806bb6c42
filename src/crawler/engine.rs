//! Crawl engine seam and the in-process queue engine
//!
//! [`CrawlEngine`] is what the orchestrator drives. [`QueueEngine`] is the
//! adapter shipped with the crate: a FIFO with dedup by unique key, a
//! concurrency cap, a request cap, immediate re-queueing of failed requests
//! and timeouts around page opening and handling. Pages come from an
//! injected [`PageSource`].

use crate::config::CrawlerConfig;
use crate::crawler::context::CrawlContext;
use crate::crawler::handler::PageHandler;
use crate::crawler::page::BrowserPage;
use crate::crawler::request::CrawlRequest;
use crate::storage::{Record, Storage};
use crate::{BrowserError, BrowserResult, HarvestError};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::collections::{HashSet, VecDeque};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio::time::timeout;

/// Counters reported by an engine run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Distinct requests started
    pub requests_total: u64,

    /// Requests whose handler completed
    pub requests_finished: u64,

    /// Requests that failed on every attempt
    pub requests_failed: u64,

    /// Number of times a request was put back in the queue
    pub requests_retried: u64,

    /// Records committed to the dataset by successful attempts
    pub records_pushed: u64,

    /// Wall-clock time of the run
    pub duration: Duration,
}

/// Runs a crawl from seed requests to an empty queue
#[async_trait]
pub trait CrawlEngine: Send + Sync {
    async fn run(
        &self,
        seeds: Vec<CrawlRequest>,
        handler: Arc<dyn PageHandler>,
    ) -> Result<CrawlStats, HarvestError>;
}

/// Opens a browser page for a URL
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn open_page(&self, url: &str) -> BrowserResult<Box<dyn BrowserPage>>;
}

/// Limits applied by [`QueueEngine`]
#[derive(Debug, Clone)]
pub struct EngineLimits {
    pub max_concurrency: usize,
    pub max_requests_per_crawl: Option<u64>,
    pub max_request_retries: u32,
    pub navigation_timeout: Duration,
    pub request_handler_timeout: Duration,
}

impl EngineLimits {
    /// Builds limits from the crawler configuration
    ///
    /// `default_max_requests` applies when the configuration leaves the
    /// request cap unset.
    pub fn from_config(config: &CrawlerConfig, default_max_requests: u32) -> Self {
        Self {
            max_concurrency: config.max_concurrency.max(1),
            max_requests_per_crawl: Some(
                config.max_requests_per_crawl.unwrap_or(default_max_requests) as u64,
            ),
            max_request_retries: config.max_request_retries,
            navigation_timeout: config.navigation_timeout(),
            request_handler_timeout: config.request_handler_timeout(),
        }
    }
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default(), u32::MAX)
    }
}

/// Queue-driven engine over an injected page source
pub struct QueueEngine {
    source: Arc<dyn PageSource>,
    storage: Arc<dyn Storage>,
    limits: EngineLimits,
}

/// Result of one attempt at a request
struct Attempt {
    request: CrawlRequest,
    records_pushed: u64,
    result: Result<Vec<CrawlRequest>, String>,
}

impl QueueEngine {
    pub fn new(source: Arc<dyn PageSource>, storage: Arc<dyn Storage>, limits: EngineLimits) -> Self {
        Self {
            source,
            storage,
            limits,
        }
    }

    pub fn limits(&self) -> &EngineLimits {
        &self.limits
    }

    fn spawn_attempt(
        &self,
        in_flight: &mut JoinSet<Attempt>,
        request: CrawlRequest,
        handler: Arc<dyn PageHandler>,
    ) {
        let source = self.source.clone();
        let storage = self.storage.clone();
        let limits = self.limits.clone();

        in_flight.spawn(async move {
            tracing::debug!(url = %request.url, retry = request.retry_count, "Processing request");
            let (records_pushed, result) =
                attempt_request(source.as_ref(), storage, handler.as_ref(), &request, &limits).await;
            Attempt {
                request,
                records_pushed,
                result: result.map_err(|e| format!("{:#}", e)),
            }
        });
    }
}

#[async_trait]
impl CrawlEngine for QueueEngine {
    async fn run(
        &self,
        seeds: Vec<CrawlRequest>,
        handler: Arc<dyn PageHandler>,
    ) -> Result<CrawlStats, HarvestError> {
        let start_time = Instant::now();
        let mut stats = CrawlStats::default();
        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<CrawlRequest> = VecDeque::new();

        for request in seeds {
            if seen.insert(request.unique_key.clone()) {
                queue.push_back(request);
            } else {
                tracing::debug!("Skipping duplicate seed {}", request.url);
            }
        }

        let mut in_flight: JoinSet<Attempt> = JoinSet::new();
        let mut cap_logged = false;

        loop {
            while in_flight.len() < self.limits.max_concurrency {
                let Some(request) = queue.pop_front() else {
                    break;
                };

                // Retries were counted when first started
                if request.retry_count == 0 {
                    if let Some(max) = self.limits.max_requests_per_crawl {
                        if stats.requests_total >= max {
                            if !cap_logged {
                                tracing::info!(
                                    "Reached max_requests_per_crawl ({}), not starting further requests",
                                    max
                                );
                                cap_logged = true;
                            }
                            continue;
                        }
                    }
                    stats.requests_total += 1;
                }

                self.spawn_attempt(&mut in_flight, request, handler.clone());
            }

            let Some(joined) = in_flight.join_next().await else {
                tracing::info!("Request queue is drained, crawl complete");
                break;
            };

            let attempt = match joined {
                Ok(attempt) => attempt,
                Err(e) => {
                    tracing::error!("Request task aborted: {}", e);
                    stats.requests_failed += 1;
                    continue;
                }
            };

            stats.records_pushed += attempt.records_pushed;
            let mut request = attempt.request;

            match attempt.result {
                Ok(enqueued) => {
                    stats.requests_finished += 1;
                    for next in enqueued {
                        if seen.insert(next.unique_key.clone()) {
                            queue.push_back(next);
                        }
                    }
                }
                Err(message) if request.retry_count < self.limits.max_request_retries => {
                    request.retry_count += 1;
                    stats.requests_retried += 1;
                    tracing::warn!(
                        "Request {} failed, retrying ({}/{}): {}",
                        request.url,
                        request.retry_count,
                        self.limits.max_request_retries,
                        message
                    );
                    queue.push_back(request);
                }
                Err(message) => {
                    stats.requests_failed += 1;
                    tracing::error!(
                        "Request {} failed {} times, giving up: {}",
                        request.url,
                        request.retry_count + 1,
                        message
                    );
                }
            }
        }

        stats.duration = start_time.elapsed();
        Ok(stats)
    }
}

/// Opens a page, runs the handler on it and closes it again
///
/// Records the handler pushed are written to the dataset only when it
/// succeeds; the returned count is the number committed. A panicking
/// handler is reported as a failed attempt.
async fn attempt_request(
    source: &dyn PageSource,
    storage: Arc<dyn Storage>,
    handler: &dyn PageHandler,
    request: &CrawlRequest,
    limits: &EngineLimits,
) -> (u64, anyhow::Result<Vec<CrawlRequest>>) {
    let page = match timeout(limits.navigation_timeout, source.open_page(&request.url)).await {
        Ok(Ok(page)) => page,
        Ok(Err(e)) => return (0, Err(e.into())),
        Err(_) => {
            let e = BrowserError::Timeout {
                what: format!("navigation to {}", request.url),
                timeout_ms: limits.navigation_timeout.as_millis() as u64,
            };
            return (0, Err(e.into()));
        }
    };

    let mut ctx = CrawlContext::new(request.clone(), page, storage.clone());
    let outcome = timeout(
        limits.request_handler_timeout,
        AssertUnwindSafe(handler.handle(&mut ctx)).catch_unwind(),
    )
    .await;
    let (page, enqueued, records) = ctx.into_parts();

    if let Err(e) = page.close().await {
        tracing::debug!("Failed to close page for {}: {}", request.url, e);
    }

    match outcome {
        Ok(Ok(Ok(()))) => match commit_records(storage.as_ref(), records) {
            Ok(committed) => (committed, Ok(enqueued)),
            Err((committed, e)) => (committed, Err(e)),
        },
        Ok(Ok(Err(e))) => (0, Err(e)),
        Ok(Err(panic)) => (
            0,
            Err(anyhow::anyhow!("request handler panicked: {}", panic_message(&*panic))),
        ),
        Err(_) => (
            0,
            Err(anyhow::anyhow!(
                "request handler timed out after {}ms",
                limits.request_handler_timeout.as_millis()
            )),
        ),
    }
}

/// Writes a successful attempt's records to the dataset in push order
///
/// On a storage error returns how many records were already written.
fn commit_records(storage: &dyn Storage, records: Vec<Record>) -> Result<u64, (u64, anyhow::Error)> {
    let mut committed = 0;
    for record in records {
        storage
            .push_data(record)
            .map_err(|e| (committed, anyhow::Error::new(e).context("failed to store record")))?;
        committed += 1;
    }
    Ok(committed)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
