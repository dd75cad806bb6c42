//! In-process fake browser used by the integration tests
//!
//! Pages are static HTML keyed by URL; selectors are matched with `scraper`
//! against the current page, so handlers see the same DOM they would parse.

#![allow(dead_code)]

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tube_harvest::crawler::{unique_key, BrowserPage, PageSource};
use tube_harvest::{BrowserError, BrowserResult};

/// A set of pages plus scripted behaviour
#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    redirects_once: Mutex<HashMap<String, String>>,
    click_navigations: HashMap<String, String>,
    open_failures: Mutex<HashMap<String, u32>>,
    pub opened: Mutex<Vec<String>>,
    pub typed: Mutex<Vec<(String, String)>>,
    pub clicked: Mutex<Vec<String>>,
    pub closed: Mutex<u32>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(unique_key(url), html.to_string());
        self
    }

    /// The first navigation to `from` lands on `to` instead
    pub fn redirect_once(self, from: &str, to: &str) -> Self {
        self.redirects_once
            .lock()
            .unwrap()
            .insert(unique_key(from), to.to_string());
        self
    }

    /// Clicking `selector` navigates to `to`
    pub fn click_navigates(mut self, selector: &str, to: &str) -> Self {
        self.click_navigations
            .insert(selector.to_string(), to.to_string());
        self
    }

    /// Opening `url` fails `times` times before it succeeds
    pub fn fail_open(self, url: &str, times: u32) -> Self {
        self.open_failures
            .lock()
            .unwrap()
            .insert(unique_key(url), times);
        self
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    fn html_for(&self, url: &str) -> Option<String> {
        self.pages.get(&unique_key(url)).cloned()
    }

    fn resolve_navigation(&self, url: &str) -> BrowserResult<String> {
        let target = self
            .redirects_once
            .lock()
            .unwrap()
            .remove(&unique_key(url))
            .unwrap_or_else(|| url.to_string());

        if self.html_for(&target).is_none() {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        Ok(target)
    }
}

/// Page source over a [`FakeSite`]
pub struct FakeSource {
    pub site: Arc<FakeSite>,
}

impl FakeSource {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
        }
    }
}

#[async_trait]
impl PageSource for FakeSource {
    async fn open_page(&self, url: &str) -> BrowserResult<Box<dyn BrowserPage>> {
        self.site.opened.lock().unwrap().push(url.to_string());

        {
            let mut failures = self.site.open_failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(&unique_key(url)) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(BrowserError::Navigation {
                        url: url.to_string(),
                        message: "net::ERR_CONNECTION_RESET".to_string(),
                    });
                }
            }
        }

        let current = self.site.resolve_navigation(url)?;
        Ok(Box::new(FakePage {
            site: self.site.clone(),
            current: Mutex::new(current),
        }))
    }
}

pub struct FakePage {
    site: Arc<FakeSite>,
    current: Mutex<String>,
}

impl FakePage {
    fn current(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    fn matches(&self, selector: &str) -> bool {
        let html = self.site.html_for(&self.current()).unwrap_or_default();
        let document = Html::parse_document(&html);
        match Selector::parse(selector) {
            Ok(parsed) => document.select(&parsed).next().is_some(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl BrowserPage for FakePage {
    async fn goto(&self, url: &str) -> BrowserResult<()> {
        let target = self.site.resolve_navigation(url)?;
        *self.current.lock().unwrap() = target;
        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<Option<String>> {
        Ok(Some(self.current()))
    }

    async fn content(&self) -> BrowserResult<String> {
        Ok(self.site.html_for(&self.current()).unwrap_or_default())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> BrowserResult<bool> {
        Ok(self.matches(selector))
    }

    async fn click(&self, selector: &str) -> BrowserResult<bool> {
        if !self.matches(selector) {
            return Ok(false);
        }
        self.site.clicked.lock().unwrap().push(selector.to_string());
        if let Some(to) = self.site.click_navigations.get(selector) {
            *self.current.lock().unwrap() = to.clone();
        }
        Ok(true)
    }

    async fn type_text(&self, selector: &str, text: &str) -> BrowserResult<()> {
        if !self.matches(selector) {
            return Err(BrowserError::ElementNotFound(selector.to_string()));
        }
        self.site
            .typed
            .lock()
            .unwrap()
            .push((selector.to_string(), text.to_string()));
        Ok(())
    }

    async fn evaluate(&self, _script: &str) -> BrowserResult<()> {
        Ok(())
    }

    async fn close(&self) -> BrowserResult<()> {
        *self.site.closed.lock().unwrap() += 1;
        Ok(())
    }
}

/// A channel "Videos" tab with one grid item per `(id, title)`
pub fn channel_page(videos: &[(&str, &str)]) -> String {
    let items: String = videos
        .iter()
        .map(|(id, title)| {
            format!(
                r#"<ytd-rich-item-renderer>
                     <img src="https://i.ytimg.com/vi/{id}/hqdefault.jpg">
                     <a id="video-title-link" href="/watch?v={id}" aria-label="{title}">{title}</a>
                     <span>1.1K views</span><span>3 days ago</span>
                   </ytd-rich-item-renderer>"#
            )
        })
        .collect();

    format!(
        r#"<html><head><title>Channel - YouTube</title></head><body>
        <ytd-two-column-browse-results-renderer>
          <div id="primary"><ytd-rich-grid-renderer><div id="contents">{}</div></ytd-rich-grid-renderer></div>
        </ytd-two-column-browse-results-renderer>
        </body></html>"#,
        items
    )
}

/// A watch page with every detail field present
pub fn watch_page(title: &str, likes: &str) -> String {
    format!(
        r#"<html><head>
          <meta itemprop="duration" content="PT3M7S">
        </head><body>
          <h1 class="ytd-watch-metadata"><yt-formatted-string>{title}</yt-formatted-string></h1>
          <ytd-channel-name><a href="/@demo">Demo Channel</a></ytd-channel-name>
          <segmented-like-dislike-button-view-model><button aria-label="like this video">
            <div class="yt-spec-button-shape-next__button-text-content">{likes}</div>
          </button></segmented-like-dislike-button-view-model>
          <ytd-expander><div id="content">About {title}</div></ytd-expander>
          <ytd-comments-header-renderer><h2 id="count">12 Comments</h2></ytd-comments-header-renderer>
        </body></html>"#
    )
}

/// A single-page sign-in form
pub fn sign_in_page() -> String {
    r#"<html><body>
        <input type="email" name="identifier"><div id="identifierNext"><button>Next</button></div>
        <input type="password" name="Passwd"><div id="passwordNext"><button>Next</button></div>
    </body></html>"#
        .to_string()
}
