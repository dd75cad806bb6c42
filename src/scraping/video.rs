//! Video watch-page extraction
//!
//! Every field is looked up through a cascade of selectors, first hit wins.
//! Missing fields stay `None`; nothing here fails on an unexpected layout.

use crate::crawler::BrowserPage;
use crate::scraping::text::{
    clean_text, comments_count, count_token, iso_duration_to_clock, likes_from_label,
};
use crate::scraping::Pacing;
use scraper::{Html, Selector};
use serde::Serialize;

const TITLE_SELECTORS: &[&str] = &[
    "#title h1.style-scope.ytd-watch-metadata yt-formatted-string",
    "h1.ytd-watch-metadata yt-formatted-string",
    "h1.ytd-watch-metadata",
    r#"h1[class*="watch"]"#,
    r#"meta[property="og:title"]"#,
    "title",
];

const DURATION_SELECTORS: &[&str] = &[
    ".ytp-time-duration",
    "span.ytp-time-duration",
    r#"meta[itemprop="duration"]"#,
    r#"[class*="duration"]"#,
];

const LIKES_SELECTORS: &[&str] = &[
    "segmented-like-dislike-button-view-model button .yt-spec-button-shape-next__button-text-content",
    r#"button[aria-label*="like"] span"#,
    r#"[aria-label*="like"]"#,
    r#"button[aria-label*="Like"]"#,
];

const COMMENTS_SELECTORS: &[&str] = &[
    "ytd-comments-header-renderer #count",
    "ytd-comments-header-renderer .count-text",
    "ytd-comments-header-renderer #title #count",
    "yt-formatted-string.count-text",
];

const CREATOR_SELECTORS: &[&str] = &[
    "ytd-channel-name a",
    "ytd-channel-name #text",
    "ytd-channel-name yt-formatted-string a",
    r#"a[class*="channel"]"#,
    r#"meta[itemprop="author"]"#,
];

const SUMMARY_SELECTORS: &[&str] = &[
    "ytd-expander #content",
    "ytd-expander #description",
    "#description",
    r#"meta[property="og:description"]"#,
    r#"meta[name="description"]"#,
];

/// Button that expands a collapsed description
const EXPAND_DESCRIPTION_SELECTOR: &str = r#"button[aria-label*="more"]"#;

/// Scrolls halfway down so the lazily loaded comment header renders
const SCROLL_TO_COMMENTS_SCRIPT: &str = "window.scrollBy(0, document.body.scrollHeight / 2);";

/// Fields read from a video's watch page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VideoDetails {
    pub video_url: String,
    pub title: Option<String>,
    pub duration: Option<String>,
    pub likes: Option<String>,
    pub creators: Option<String>,
    pub summary: Option<String>,
    pub comments_count: Option<String>,
}

/// Extracts details from a rendered watch page
pub fn extract_video_details(html: &str, video_url: &str) -> VideoDetails {
    let document = Html::parse_document(html);

    VideoDetails {
        video_url: video_url.to_string(),
        title: first_value(&document, TITLE_SELECTORS),
        duration: first_value(&document, DURATION_SELECTORS).map(|d| iso_duration_to_clock(&d)),
        likes: extract_likes(&document),
        creators: first_value(&document, CREATOR_SELECTORS),
        summary: first_value(&document, SUMMARY_SELECTORS),
        comments_count: first_text(&document, COMMENTS_SELECTORS)
            .and_then(|text| comments_count(&text)),
    }
}

/// Prepares the current watch page and extracts its details
///
/// Scrolling and expanding the description are best-effort; their failures
/// are logged at debug level only.
pub async fn read_video_details(
    page: &dyn BrowserPage,
    pacing: &Pacing,
) -> anyhow::Result<VideoDetails> {
    tokio::time::sleep(pacing.after_video_navigation).await;

    if let Err(e) = page.evaluate(SCROLL_TO_COMMENTS_SCRIPT).await {
        tracing::debug!("Failed to scroll to comments: {}", e);
    }
    tokio::time::sleep(pacing.after_scroll).await;

    match page.click(EXPAND_DESCRIPTION_SELECTOR).await {
        Ok(true) => tokio::time::sleep(pacing.after_expand).await,
        Ok(false) => {}
        Err(e) => tracing::debug!("Failed to expand description: {}", e),
    }

    let video_url = page.current_url().await?.unwrap_or_default();
    let html = page.content().await?;
    let details = extract_video_details(&html, &video_url);

    tracing::info!(
        "Extracted video info for: {}",
        details.title.as_deref().unwrap_or("Unknown")
    );
    Ok(details)
}

/// Value of the first selector that yields one: `content` for `<meta>`, text otherwise
fn first_value(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        let parsed = Selector::parse(selector).ok()?;
        let element = document.select(&parsed).next()?;
        if element.value().name() == "meta" {
            element.value().attr("content").and_then(clean_text)
        } else {
            clean_text(&element.text().collect::<String>())
        }
    })
}

/// Text of the first selector whose element has non-blank text
fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        let parsed = Selector::parse(selector).ok()?;
        let element = document.select(&parsed).next()?;
        clean_text(&element.text().collect::<String>())
    })
}

/// Like count from button text, falling back to the button's aria-label
fn extract_likes(document: &Html) -> Option<String> {
    for selector in LIKES_SELECTORS {
        let Ok(parsed) = Selector::parse(selector) else {
            continue;
        };
        let Some(element) = document.select(&parsed).next() else {
            continue;
        };

        if let Some(text) = clean_text(&element.text().collect::<String>()) {
            return Some(count_token(&text).unwrap_or(text));
        }

        if let Some(likes) = element.value().attr("aria-label").and_then(likes_from_label) {
            return Some(likes);
        }
    }
    None
}
