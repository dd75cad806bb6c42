//! Per-request context handed to the page handler

use crate::crawler::page::BrowserPage;
use crate::crawler::request::CrawlRequest;
use crate::storage::{Record, Storage, StorageResult};
use serde_json::Value;
use std::sync::Arc;

/// Everything a page handler can reach during one invocation
pub struct CrawlContext {
    request: CrawlRequest,
    page: Box<dyn BrowserPage>,
    storage: Arc<dyn Storage>,
    enqueued: Vec<CrawlRequest>,
    pending: Vec<Record>,
}

impl CrawlContext {
    pub fn new(request: CrawlRequest, page: Box<dyn BrowserPage>, storage: Arc<dyn Storage>) -> Self {
        Self {
            request,
            page,
            storage,
            enqueued: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// The request being handled
    pub fn request(&self) -> &CrawlRequest {
        &self.request
    }

    /// The browser tab opened for this request
    pub fn page(&self) -> &dyn BrowserPage {
        self.page.as_ref()
    }

    /// Queues a record for the dataset
    ///
    /// Records reach the sink only if the handler returns `Ok`; a failed
    /// attempt discards them along with its enqueued requests.
    pub fn push_data(&mut self, record: Record) {
        self.pending.push(record);
    }

    /// Stores a named value in the key-value store
    pub fn set_value(&self, key: &str, value: &Value) -> StorageResult<()> {
        self.storage.set_value(key, value)
    }

    /// Asks the engine to crawl `request` later
    pub fn enqueue(&mut self, request: CrawlRequest) {
        self.enqueued.push(request);
    }

    /// Splits the context back into the page, the enqueued requests and the queued records
    pub(crate) fn into_parts(self) -> (Box<dyn BrowserPage>, Vec<CrawlRequest>, Vec<Record>) {
        (self.page, self.enqueued, self.pending)
    }
}
