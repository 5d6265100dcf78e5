// src/utils/text.rs

//! Text cleanup helpers shared by the formatter, renderer and publisher.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("tag pattern is valid"));

/// Remove anything shaped like a markup tag.
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Collapse runs of whitespace to single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip control characters and tags, then cut to `max_chars`.
pub fn sanitize(text: &str, max_chars: usize) -> String {
    let printable: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let cleaned = normalize_whitespace(&strip_tags(&printable));
    cleaned.chars().take(max_chars).collect()
}

/// Join list items with `", "`, or return `fallback` when there are none.
pub fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

/// Parse an ISO-8601 or `YYYY-MM-DD HH:MM:SS[ UTC]` timestamp as UTC.
pub fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    let trimmed = timestamp.trim();
    if trimmed.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(dt.with_timezone(&Utc));
        }
        return NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc());
    }

    NaiveDateTime::parse_from_str(trimmed.trim_end_matches(" UTC"), "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS UTC`; unparsable input is returned unchanged.
pub fn format_timestamp(timestamp: &str) -> String {
    parse_timestamp(timestamp)
        .map(|dt| format_utc(&dt))
        .unwrap_or_else(|| timestamp.to_string())
}

/// Format a UTC instant for the status bar.
pub fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(
            strip_tags("<p>Armed and <b>dangerous</b></p>"),
            "Armed and dangerous"
        );
        assert_eq!(strip_tags("height < 6 ft"), "height < 6 ft");
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("a\u{0007}b <i>c</i>\r\nd", 100), "a b c d");
        assert_eq!(sanitize("abcdef", 3), "abc");
    }

    #[test]
    fn test_join_or() {
        assert_eq!(join_or(&[], "Unknown"), "Unknown");
        assert_eq!(
            join_or(&["English".to_string(), "Spanish".to_string()], "Unknown"),
            "English, Spanish"
        );
    }

    #[test]
    fn test_format_timestamp_variants() {
        assert_eq!(
            format_timestamp("2024-05-01T12:30:00Z"),
            "2024-05-01 12:30:00 UTC"
        );
        assert_eq!(
            format_timestamp("2024-05-01T14:30:00.250+02:00"),
            "2024-05-01 12:30:00 UTC"
        );
        assert_eq!(
            format_timestamp("2024-05-01T12:30:00.123456"),
            "2024-05-01 12:30:00 UTC"
        );
        assert_eq!(
            format_timestamp("2024-05-01 12:30:00 UTC"),
            "2024-05-01 12:30:00 UTC"
        );
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
