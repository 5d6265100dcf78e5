// src/services/formatter.rs

//! Maps raw listing records onto [`PresentationRecord`].
//!
//! Formatting is total: any field the API leaves out, nulls, or sends with the
//! wrong shape falls back to the documented default.

use serde_json::Value;

use crate::models::{PresentationRecord, RawRecord};
use crate::utils::text::{join_or, strip_tags};
use crate::utils::url::{canonical_page_url, normalize_image_url};

const UNKNOWN: &str = PresentationRecord::UNKNOWN;

/// Image variant keys in order of preference.
const IMAGE_VARIANTS: [&str; 2] = ["original", "large"];

/// Build a display record from a raw API record.
pub fn format(raw: &RawRecord) -> PresentationRecord {
    let text = |key: &str, fallback: &str| {
        raw.str_field(key)
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    };

    PresentationRecord {
        title: text("title", UNKNOWN),
        description: text("description", ""),
        details: raw
            .str_field("details")
            .map(|d| strip_tags(d).trim().to_string())
            .unwrap_or_default(),
        subjects: join_or(&raw.list_field("subjects"), UNKNOWN),
        race: text("race", UNKNOWN),
        sex: text("sex", UNKNOWN),
        nationality: text("nationality", UNKNOWN),
        hair: text("hair", UNKNOWN),
        eyes: text("eyes", UNKNOWN),
        height: format_height(raw),
        dates_of_birth: join_or(&raw.list_field("dates_of_birth_used"), UNKNOWN),
        languages: join_or(&raw.list_field("languages"), UNKNOWN),
        scars_and_marks: raw
            .str_field("scars_and_marks")
            .map(|s| strip_tags(s).trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| PresentationRecord::NO_SCARS.to_string()),
        status: text("status", ""),
        reward_text: raw
            .str_field("reward_text")
            .map(|r| strip_tags(r).trim().to_string())
            .unwrap_or_default(),
        warning_message: text("warning_message", ""),
        image_url: select_image(raw),
        detail_url: detail_url(raw),
    }
}

/// `"<min>-<max>"` when both bounds are known, else `"Unknown"`.
fn format_height(raw: &RawRecord) -> String {
    match (raw.num_field("height_min"), raw.num_field("height_max")) {
        (Some(min), Some(max)) => format!("{}-{}", min.round() as i64, max.round() as i64),
        _ => UNKNOWN.to_string(),
    }
}

/// Pick the highest-resolution image variant and normalize its URL.
fn select_image(raw: &RawRecord) -> Option<String> {
    raw.images().into_iter().find_map(|image| {
        IMAGE_VARIANTS.iter().find_map(|variant| {
            image
                .get(*variant)
                .and_then(Value::as_str)
                .and_then(normalize_image_url)
        })
    })
}

/// The record's profile page: explicit `url`, else one built from its `path`.
fn detail_url(raw: &RawRecord) -> Option<String> {
    if let Some(url) = raw.str_field("url") {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Some(url.to_string());
        }
    }
    raw.str_field("path").and_then(canonical_page_url)
}
