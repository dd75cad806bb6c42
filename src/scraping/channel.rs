//! The YouTube channel page handler
//!
//! For every request: open the channel's "Videos" tab (or the request URL
//! when no channel is configured), sign in if a sign-in wall shows up, list
//! the grid videos, visit each one for details, then store the list under
//! [`VIDEO_INFO_KEY`] and push one dataset record per video.

use crate::credentials::Credentials;
use crate::crawler::{unique_key, BrowserPage, CrawlContext, PageHandler};
use crate::input::ActorInput;
use crate::scraping::listing::{parse_channel_videos, VideoSummary, VIDEO_GRID_READY_SELECTOR};
use crate::scraping::login::{is_login_page, sign_in};
use crate::scraping::video::{read_video_details, VideoDetails};
use crate::scraping::Pacing;
use crate::storage::Record;
use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Key under which the full video list of the last handled page is stored
pub const VIDEO_INFO_KEY: &str = "video_information.json";

/// Base for relative video links
pub const YOUTUBE_ORIGIN: &str = "https://www.youtube.com";

/// How long to wait for the channel grid to render
const GRID_READY_TIMEOUT: Duration = Duration::from_secs(10);

/// Handler settings derived from the input
#[derive(Debug, Clone)]
pub struct ChannelOptions {
    /// Channel handle without `@`
    pub channel: Option<String>,
    pub max_videos: usize,
    pub pacing: Pacing,
}

impl ChannelOptions {
    pub fn from_input(input: &ActorInput) -> Self {
        Self {
            channel: input.channel_handle(),
            max_videos: input.max_videos as usize,
            pacing: Pacing::default(),
        }
    }

    /// URL of the channel's "Videos" tab, if a channel is configured
    pub fn channel_videos_url(&self) -> Option<String> {
        self.channel
            .as_ref()
            .map(|handle| format!("{}/@{}/videos", YOUTUBE_ORIGIN, handle))
    }
}

/// One dataset record: grid fields merged with watch-page details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VideoRecord {
    pub video_url: String,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "viscount")]
    pub view_count: Option<String>,
    pub age: Option<String>,
    pub duration: Option<String>,
    pub likes: Option<String>,
    pub creators: Option<String>,
    pub summary: Option<String>,
    pub comments_count: Option<String>,
}

impl VideoRecord {
    fn from_summary(summary: VideoSummary, page_url: &str) -> Self {
        Self {
            video_url: page_url.to_string(),
            title: summary.title,
            thumbnail: summary.thumbnail,
            link: summary.link,
            view_count: summary.view_count,
            age: summary.age,
            ..Self::default()
        }
    }

    /// Merges watch-page details; a detail title replaces the grid title
    fn merge_details(&mut self, details: VideoDetails) {
        self.video_url = details.video_url;
        if details.title.is_some() {
            self.title = details.title;
        }
        self.duration = details.duration;
        self.likes = details.likes;
        self.creators = details.creators;
        self.summary = details.summary;
        self.comments_count = details.comments_count;
    }

    pub fn to_record(&self) -> anyhow::Result<Record> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => anyhow::bail!("video record serialized to {}", other),
        }
    }
}

/// Resolves a grid link against the YouTube origin
pub fn absolute_video_link(link: &str) -> String {
    if link.starts_with('/') {
        format!("{}{}", YOUTUBE_ORIGIN, link)
    } else {
        link.to_string()
    }
}

/// Page handler scraping a channel's video list
pub struct ChannelHandler {
    options: ChannelOptions,
    credentials: Arc<Credentials>,
}

impl ChannelHandler {
    pub fn new(options: ChannelOptions, credentials: Arc<Credentials>) -> Self {
        Self {
            options,
            credentials,
        }
    }

    /// Brings the page to `target`, signing in on the way if asked to
    async fn open_target(&self, page: &dyn BrowserPage, target: &str) -> anyhow::Result<()> {
        let current = page.current_url().await?.unwrap_or_default();
        if unique_key(&current) != unique_key(target) {
            tracing::info!("Navigating to {}", target);
            page.goto(target).await?;
        }

        let current = page.current_url().await?.unwrap_or_default();
        if is_login_page(&current) {
            if self.credentials.is_complete() {
                sign_in(page, &self.credentials, &self.options.pacing).await?;
                if !is_login_page(target) {
                    page.goto(target).await?;
                }
            } else {
                tracing::warn!("Landed on a sign-in page without credentials, continuing unauthenticated");
            }
        }

        tokio::time::sleep(self.options.pacing.after_navigation).await;

        if page
            .wait_for_selector(VIDEO_GRID_READY_SELECTOR, GRID_READY_TIMEOUT)
            .await?
        {
            tracing::debug!("Video grid rendered");
        } else {
            tracing::warn!("Video grid not found on {}", target);
        }

        Ok(())
    }

    /// Lists grid videos on the current page and visits each one
    async fn collect_videos(&self, page: &dyn BrowserPage) -> anyhow::Result<Vec<VideoRecord>> {
        let page_url = page.current_url().await?.unwrap_or_default();
        let html = page.content().await?;
        let summaries = parse_channel_videos(&html, self.options.max_videos);
        tracing::info!("Found {} videos on {}", summaries.len(), page_url);

        let total = summaries.len();
        let mut records = Vec::with_capacity(total);

        for (idx, summary) in summaries.into_iter().enumerate() {
            let mut record = VideoRecord::from_summary(summary, &page_url);

            let Some(link) = record.link.as_deref().map(absolute_video_link) else {
                records.push(record);
                continue;
            };
            record.link = Some(link.clone());

            tracing::info!("Visiting video {}/{}: {}", idx + 1, total, link);
            let visited = async {
                page.goto(&link).await?;
                read_video_details(page, &self.options.pacing).await
            }
            .await;

            match visited {
                Ok(details) => record.merge_details(details),
                Err(e) => tracing::warn!("Error visiting video {}: {:#}", link, e),
            }
            records.push(record);
        }

        Ok(records)
    }
}

#[async_trait]
impl PageHandler for ChannelHandler {
    async fn handle(&self, ctx: &mut CrawlContext) -> anyhow::Result<()> {
        tracing::info!("Scraping is started for {}", ctx.request().url);

        let target = self
            .options
            .channel_videos_url()
            .unwrap_or_else(|| ctx.request().url.clone());

        let videos = {
            let page = ctx.page();
            self.open_target(page, &target)
                .await
                .with_context(|| format!("failed to open {}", target))?;
            self.collect_videos(page).await?
        };

        let list = serde_json::to_value(&videos)?;
        ctx.set_value(VIDEO_INFO_KEY, &list)?;
        tracing::info!("Saved {} videos under '{}'", videos.len(), VIDEO_INFO_KEY);

        for video in &videos {
            ctx.push_data(video.to_record()?);
        }

        Ok(())
    }
}
