//! Text clean-up helpers for scraped values

use regex::Regex;
use std::sync::OnceLock;

fn count_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)([\d,.]+[KMB]?)").expect("valid regex"))
}

fn likes_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)([\d,.]+[KMB]?)\s*likes?").expect("valid regex"))
}

fn comments_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)([\d,.]+)\s+comments?").expect("valid regex"))
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\d,.]+").expect("valid regex"))
}

fn iso_duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^P(?:(\d+)D)?T?(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("valid regex")
    })
}

/// Collapses runs of whitespace and trims; `None` if nothing is left
pub fn clean_text(raw: &str) -> Option<String> {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Pulls a compact count such as `1.2K` or `345` out of button text
pub fn count_token(text: &str) -> Option<String> {
    count_token_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|token| token.chars().any(|c| c.is_ascii_digit()))
}

/// Pulls the like count out of an aria-label such as `"1.2K likes"`
pub fn likes_from_label(label: &str) -> Option<String> {
    likes_label_re()
        .captures(label)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Pulls the comment count out of a header such as `"1,234 Comments"`
///
/// Falls back to the first number in the text.
pub fn comments_count(text: &str) -> Option<String> {
    if let Some(m) = comments_re().captures(text).and_then(|c| c.get(1)) {
        return Some(m.as_str().to_string());
    }
    number_re()
        .find(text)
        .map(|m| m.as_str().to_string())
        .filter(|token| token.chars().any(|c| c.is_ascii_digit()))
}

/// Formats an ISO-8601 duration (`PT4M13S`) as a clock string (`4:13`)
///
/// Hours are shown only when non-zero; minutes and seconds below an hour
/// mark are zero-padded. Anything that is not an ISO duration, or whose
/// components do not fit a `u64`, is returned trimmed and unchanged.
pub fn iso_duration_to_clock(raw: &str) -> String {
    let raw = raw.trim();
    let Some(caps) = iso_duration_re().captures(raw) else {
        return raw.to_string();
    };
    if raw == "P" || raw == "PT" {
        return raw.to_string();
    }

    let part = |i: usize| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    let clock = || -> Option<String> {
        let hours = part(1)?.checked_mul(24)?.checked_add(part(2)?)?;
        let minutes = part(3)?;
        let seconds = part(4)?;

        Some(if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{}:{:02}", minutes, seconds)
        })
    };

    clock().unwrap_or_else(|| raw.to_string())
}
