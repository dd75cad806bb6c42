//! The page handler seam

use crate::crawler::context::CrawlContext;
use async_trait::async_trait;

/// Callback invoked once per successfully opened page
///
/// Invocations may run concurrently for different requests, so an
/// implementation must not keep per-invocation state in `self`. Errors are
/// handed to the engine's retry policy.
#[async_trait]
pub trait PageHandler: Send + Sync {
    async fn handle(&self, ctx: &mut CrawlContext) -> anyhow::Result<()>;
}
