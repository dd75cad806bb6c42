//! Crawl requests and their dedup key

use url::Url;

/// A URL queued for crawling
///
/// Created from the seed URLs or by a handler's `enqueue`; after that only
/// the engine touches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// The URL to open
    pub url: String,

    /// Normalized form of `url`; two requests with the same key are one request
    pub unique_key: String,

    /// How many times this request has already failed
    pub retry_count: u32,

    /// Free-form label a handler can route on
    pub label: Option<String>,
}

impl CrawlRequest {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let unique_key = unique_key(&url);
        Self {
            url,
            unique_key,
            retry_count: 0,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Computes the dedup key of a URL
///
/// # Normalization Steps
///
/// 1. Parse the URL; unparsable input is only trimmed
/// 2. Lowercase scheme and host (done by the parser)
/// 3. Remove the fragment
/// 4. Sort query parameters; drop an empty query string
/// 5. Remove a trailing slash, except for the root path
///
/// # Examples
///
/// ```
/// use tube_harvest::crawler::unique_key;
///
/// assert_eq!(
///     unique_key("HTTPS://Example.COM/a/?b=2&a=1#top"),
///     "https://example.com/a?a=1&b=2"
/// );
/// ```
pub fn unique_key(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(_) => return trimmed.to_string(),
    };

    url.set_fragment(None);

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        pairs.sort();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    let path = url.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        url.set_path(path.trim_end_matches('/'));
    }

    url.to_string()
}
