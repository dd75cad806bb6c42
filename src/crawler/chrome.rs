//! Chrome backend over the DevTools protocol
//!
//! [`ChromeSource`] owns one browser process and opens a tab per request;
//! [`ChromePage`] adapts a `chromiumoxide` tab to [`BrowserPage`].

use crate::config::BrowserSettings;
use crate::crawler::engine::PageSource;
use crate::crawler::page::BrowserPage;
use crate::{BrowserError, BrowserResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Interval between selector probes in [`ChromePage::wait_for_selector`]
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

fn protocol_error(e: CdpError) -> BrowserError {
    BrowserError::Protocol(e.to_string())
}

/// A launched Chrome process
pub struct ChromeSource {
    browser: Mutex<Browser>,
    handler_task: Mutex<Option<JoinHandle<()>>>,
}

impl ChromeSource {
    /// Launches Chrome with the given settings
    ///
    /// The DevTools event stream is driven on a background task for as long
    /// as the browser lives.
    pub async fn launch(settings: &BrowserSettings) -> BrowserResult<Self> {
        let mut builder = BrowserConfig::builder().args(settings.args.iter());
        if !settings.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser event handler error: {}", e);
                }
            }
        });

        tracing::info!(
            "Launched Chrome (headless: {}, args: {:?})",
            settings.headless,
            settings.args
        );

        Ok(Self {
            browser: Mutex::new(browser),
            handler_task: Mutex::new(Some(handler_task)),
        })
    }

    /// Closes the browser and stops the event task
    pub async fn shutdown(&self) {
        let mut browser = self.browser.lock().await;
        if let Err(e) = browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = browser.wait().await {
            tracing::debug!("Failed to wait for browser process: {}", e);
        }

        if let Some(task) = self.handler_task.lock().await.take() {
            task.abort();
        }
    }
}

#[async_trait]
impl PageSource for ChromeSource {
    async fn open_page(&self, url: &str) -> BrowserResult<Box<dyn BrowserPage>> {
        // Only the tab creation needs the browser; navigation runs unlocked.
        let page = {
            let browser = self.browser.lock().await;
            browser
                .new_page("about:blank")
                .await
                .map_err(protocol_error)?
        };

        let page = ChromePage::new(page);
        if let Err(e) = page.goto(url).await {
            if let Err(close_err) = page.close().await {
                tracing::debug!("Failed to close page after navigation error: {}", close_err);
            }
            return Err(e);
        }

        Ok(Box::new(page))
    }
}

/// One Chrome tab
pub struct ChromePage {
    page: Page,
}

impl ChromePage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

#[async_trait]
impl BrowserPage for ChromePage {
    async fn goto(&self, url: &str) -> BrowserResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<Option<String>> {
        self.page.url().await.map_err(protocol_error)
    }

    async fn content(&self) -> BrowserResult<String> {
        self.page.content().await.map_err(protocol_error)
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> BrowserResult<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn click(&self, selector: &str) -> BrowserResult<bool> {
        match self.page.find_element(selector).await {
            Ok(element) => {
                element.click().await.map_err(protocol_error)?;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    async fn type_text(&self, selector: &str, text: &str) -> BrowserResult<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::ElementNotFound(selector.to_string()))?;
        element.click().await.map_err(protocol_error)?;
        element.type_str(text).await.map_err(protocol_error)?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> BrowserResult<()> {
        self.page.evaluate(script).await.map_err(protocol_error)?;
        Ok(())
    }

    async fn close(&self) -> BrowserResult<()> {
        self.page.clone().close().await.map_err(protocol_error)
    }
}
