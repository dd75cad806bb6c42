//! Channel "Videos" tab parsing

use crate::scraping::text::clean_text;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

/// Grid items on a channel's "Videos" tab
pub const VIDEO_GRID_ITEM_SELECTOR: &str = "ytd-two-column-browse-results-renderer div#primary ytd-rich-grid-renderer div#contents ytd-rich-item-renderer";

/// Container that appears once the channel page has rendered
pub const VIDEO_GRID_READY_SELECTOR: &str = "ytd-two-column-browse-results-renderer";

/// One entry of a channel's video grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VideoSummary {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub link: Option<String>,
    pub view_count: Option<String>,
    pub age: Option<String>,
}

/// Parses up to `max_videos` grid items from a rendered channel page
pub fn parse_channel_videos(html: &str, max_videos: usize) -> Vec<VideoSummary> {
    let document = Html::parse_document(html);
    let Ok(item_selector) = Selector::parse(VIDEO_GRID_ITEM_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&item_selector)
        .take(max_videos)
        .map(parse_grid_item)
        .collect()
}

fn parse_grid_item(item: ElementRef<'_>) -> VideoSummary {
    let title_link = first_match(item, "a#video-title-link");

    let title = title_link.and_then(|link| {
        link.value()
            .attr("aria-label")
            .and_then(clean_text)
            .or_else(|| clean_text(&link.text().collect::<String>()))
    });

    let link = title_link
        .and_then(|link| link.value().attr("href"))
        .map(str::to_string);

    let thumbnail = first_match(item, "img")
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string);

    VideoSummary {
        title,
        thumbnail,
        link,
        view_count: span_containing(item, "views"),
        age: span_containing(item, "ago"),
    }
}

fn first_match<'a>(scope: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    scope.select(&selector).next()
}

/// Text of the first `<span>` whose text contains `needle`
fn span_containing(scope: ElementRef<'_>, needle: &str) -> Option<String> {
    let selector = Selector::parse("span").ok()?;
    scope
        .select(&selector)
        .map(|span| span.text().collect::<String>())
        .find(|text| text.contains(needle))
        .and_then(|text| clean_text(&text))
}
