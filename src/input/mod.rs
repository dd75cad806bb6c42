//! Actor input loading
//!
//! The platform hands the actor a JSON object. Locally it lives in the
//! default key-value store directory as `INPUT.json`.

use crate::InputError;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Where the platform drops the input object in local runs
pub const DEFAULT_INPUT_PATH: &str = "storage/key_value_stores/default/INPUT.json";

/// Seed used when the input has no `start_urls` key at all
pub const DEFAULT_START_URL: &str = "https://www.youtube.com";

/// Number of videos scraped from a channel when the input does not say
pub const DEFAULT_MAX_VIDEOS: u32 = 30;

/// One entry of `start_urls`: a bare string or a `{ "url": ... }` object
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StartUrl {
    Plain(String),
    Request { url: String },
}

impl StartUrl {
    pub fn as_str(&self) -> &str {
        match self {
            StartUrl::Plain(url) | StartUrl::Request { url } => url,
        }
    }
}

/// The actor input object
#[derive(Clone, Deserialize)]
pub struct ActorInput {
    #[serde(default = "default_start_urls")]
    pub start_urls: Vec<StartUrl>,

    #[serde(default)]
    pub youtube_email: Option<String>,

    #[serde(default)]
    pub youtube_password: Option<String>,

    /// Channel handle whose video list is scraped (e.g. `@SomeChannel`)
    #[serde(default)]
    pub channel: Option<String>,

    /// Accepts a number or a numeric string such as `"30"`
    #[serde(default = "default_max_videos", deserialize_with = "deserialize_count")]
    pub max_videos: u32,
}

// Hand-written so the password never reaches a log line through `{:?}`.
impl std::fmt::Debug for ActorInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorInput")
            .field("start_urls", &self.start_urls)
            .field("youtube_email", &self.youtube_email)
            .field(
                "youtube_password",
                &self.youtube_password.as_ref().map(|_| "<redacted>"),
            )
            .field("channel", &self.channel)
            .field("max_videos", &self.max_videos)
            .finish()
    }
}

impl Default for ActorInput {
    fn default() -> Self {
        Self {
            start_urls: default_start_urls(),
            youtube_email: None,
            youtube_password: None,
            channel: None,
            max_videos: DEFAULT_MAX_VIDEOS,
        }
    }
}

impl ActorInput {
    /// Returns the seed URLs in input order
    pub fn seed_urls(&self) -> Vec<String> {
        self.start_urls
            .iter()
            .map(|u| u.as_str().trim().to_string())
            .collect()
    }

    /// Returns the channel handle with `@` and whitespace removed, if any is left
    pub fn channel_handle(&self) -> Option<String> {
        let handle: String = self
            .channel
            .as_deref()?
            .chars()
            .filter(|c| *c != '@' && !c.is_whitespace())
            .collect();
        if handle.is_empty() {
            None
        } else {
            Some(handle)
        }
    }
}

fn default_start_urls() -> Vec<StartUrl> {
    vec![StartUrl::Plain(DEFAULT_START_URL.to_string())]
}

fn default_max_videos() -> u32 {
    DEFAULT_MAX_VIDEOS
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountValue {
    Number(u32),
    Text(String),
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match CountValue::deserialize(deserializer)? {
        CountValue::Number(n) => Ok(n),
        CountValue::Text(text) => text.trim().parse().map_err(|_| {
            de::Error::custom(format!("expected a non-negative integer, got {:?}", text))
        }),
    }
}

/// Loads the actor input from a JSON file
pub fn load_input(path: &Path) -> Result<ActorInput, InputError> {
    let content = std::fs::read_to_string(path)?;
    parse_input(&content)
}

/// Parses and validates the actor input from a JSON string
///
/// `null` or an empty document is treated as an empty object, so every
/// field falls back to its default.
pub fn parse_input(content: &str) -> Result<ActorInput, InputError> {
    let trimmed = content.trim();
    let input: ActorInput = if trimmed.is_empty() || trimmed == "null" {
        ActorInput::default()
    } else {
        serde_json::from_str(trimmed)?
    };

    for start_url in &input.start_urls {
        validate_start_url(start_url.as_str())?;
    }

    Ok(input)
}

fn validate_start_url(raw: &str) -> Result<(), InputError> {
    let url = Url::parse(raw.trim()).map_err(|e| InputError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(InputError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_start_urls_defaults_to_youtube() {
        let input = parse_input("{}").unwrap();
        assert_eq!(input.seed_urls(), vec![DEFAULT_START_URL.to_string()]);
        assert_eq!(input.max_videos, DEFAULT_MAX_VIDEOS);
    }

    #[test]
    fn test_null_input_uses_defaults() {
        let input = parse_input("null").unwrap();
        assert_eq!(input.start_urls.len(), 1);
        assert!(input.youtube_email.is_none());
    }

    #[test]
    fn test_start_urls_accept_strings_and_objects() {
        let input = parse_input(
            r#"{"start_urls": ["https://example.com/a", {"url": "https://example.com/b"}]}"#,
        )
        .unwrap();
        assert_eq!(
            input.seed_urls(),
            vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string()
            ]
        );
    }

    #[test]
    fn test_empty_start_urls_are_kept_empty() {
        let input = parse_input(r#"{"start_urls": []}"#).unwrap();
        assert!(input.seed_urls().is_empty());
    }

    #[test]
    fn test_invalid_start_url_rejected() {
        let result = parse_input(r#"{"start_urls": ["not a url"]}"#);
        assert!(matches!(result, Err(InputError::InvalidUrl { .. })));

        let result = parse_input(r#"{"start_urls": ["ftp://example.com/file"]}"#);
        assert!(matches!(result, Err(InputError::InvalidUrl { .. })));
    }

    #[test]
    fn test_max_videos_accepts_numeric_strings() {
        let input = parse_input(r#"{"max_videos": 12}"#).unwrap();
        assert_eq!(input.max_videos, 12);

        let input = parse_input(r#"{"max_videos": " 7 "}"#).unwrap();
        assert_eq!(input.max_videos, 7);

        assert!(matches!(
            parse_input(r#"{"max_videos": "lots"}"#),
            Err(InputError::Parse(_))
        ));
        assert!(matches!(
            parse_input(r#"{"max_videos": -1}"#),
            Err(InputError::Parse(_))
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(parse_input("{"), Err(InputError::Parse(_))));
    }

    #[test]
    fn test_channel_handle_strips_at_and_spaces() {
        let input = parse_input(r#"{"channel": "@Some Channel"}"#).unwrap();
        assert_eq!(input.channel_handle(), Some("SomeChannel".to_string()));

        let input = parse_input(r#"{"channel": " @ "}"#).unwrap();
        assert_eq!(input.channel_handle(), None);
    }

    #[test]
    fn test_debug_redacts_password() {
        let input =
            parse_input(r#"{"youtube_email": "a@b.com", "youtube_password": "hunter2"}"#).unwrap();
        let printed = format!("{:?}", input);
        assert!(printed.contains("a@b.com"));
        assert!(!printed.contains("hunter2"));
    }
}
