//! YouTube scraping: the page handler and its extraction helpers

mod channel;
pub mod listing;
pub mod login;
pub mod text;
pub mod video;

pub use channel::{
    absolute_video_link, ChannelHandler, ChannelOptions, VideoRecord, VIDEO_INFO_KEY,
    YOUTUBE_ORIGIN,
};

use std::time::Duration;

/// Fixed waits that give client-side rendering time to settle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pacing {
    /// After landing on the target page
    pub after_navigation: Duration,
    /// After opening a video page
    pub after_video_navigation: Duration,
    /// After scrolling towards the comments
    pub after_scroll: Duration,
    /// After expanding the description
    pub after_expand: Duration,
    /// After each sign-in form step
    pub after_login_step: Duration,
}

impl Pacing {
    /// No waits at all, for pages that are fully rendered on arrival
    pub fn none() -> Self {
        Self {
            after_navigation: Duration::ZERO,
            after_video_navigation: Duration::ZERO,
            after_scroll: Duration::ZERO,
            after_expand: Duration::ZERO,
            after_login_step: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            after_navigation: Duration::from_secs(5),
            after_video_navigation: Duration::from_secs(2),
            after_scroll: Duration::from_secs(1),
            after_expand: Duration::from_millis(500),
            after_login_step: Duration::from_secs(3),
        }
    }
}
