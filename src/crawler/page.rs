//! Browser page abstraction
//!
//! One [`BrowserPage`] is one tab. A page handler owns it for the duration
//! of a single invocation; the engine closes it afterwards.

use crate::BrowserResult;
use async_trait::async_trait;
use std::time::Duration;

/// Operations a page handler may perform on a browser tab
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Navigates to `url` and waits for the load to finish
    async fn goto(&self, url: &str) -> BrowserResult<()>;

    /// Returns the URL currently shown, if the browser reports one
    async fn current_url(&self) -> BrowserResult<Option<String>>;

    /// Returns the serialized DOM of the rendered page
    async fn content(&self) -> BrowserResult<String>;

    /// Waits until `selector` matches an element
    ///
    /// Returns `false` if the timeout elapsed first.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> BrowserResult<bool>;

    /// Clicks the first element matching `selector`
    ///
    /// Returns `false` if nothing matched.
    async fn click(&self, selector: &str) -> BrowserResult<bool>;

    /// Focuses the first element matching `selector` and types `text` into it
    async fn type_text(&self, selector: &str, text: &str) -> BrowserResult<()>;

    /// Runs a script in the page, discarding its result
    async fn evaluate(&self, script: &str) -> BrowserResult<()>;

    /// Closes the tab
    async fn close(&self) -> BrowserResult<()>;
}
