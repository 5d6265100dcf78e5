//! Outbound payloads: the webhook merge variables and the local snapshot.

use serde::{Deserialize, Serialize};

use super::Wanted;
use crate::utils::text::{format_timestamp, sanitize};

/// Longest text accepted for a single merge variable.
const MAX_MERGE_TEXT: usize = 500;

/// Variables the display template interpolates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeVariables {
    pub title: String,
    pub description: String,
    pub status: String,
    pub reward_text: String,
    pub total_wanted: u64,
    pub timestamp: String,
    pub updated_at: String,
    pub image_url: Option<String>,
    pub detail_url: Option<String>,
    pub qr_code_url: Option<String>,
}

impl MergeVariables {
    pub fn new(wanted: &Wanted, qr_code_url: Option<String>) -> Self {
        let record = &wanted.record;
        let timestamp = wanted.fetched_at.to_rfc3339();
        Self {
            title: sanitize(&record.title, MAX_MERGE_TEXT),
            description: sanitize(&record.description.replace("\r\n", " - "), MAX_MERGE_TEXT),
            status: record.display_status().to_string(),
            reward_text: sanitize(&record.reward_text, MAX_MERGE_TEXT),
            total_wanted: wanted.total,
            updated_at: format_timestamp(&timestamp),
            timestamp,
            image_url: record.image_url.clone(),
            detail_url: record.detail_url.clone(),
            qr_code_url,
        }
    }
}

/// JSON body of the merge-variables webhook variant.
#[derive(Debug, Clone, Serialize)]
pub struct MergeBody<'a> {
    pub merge_variables: &'a MergeVariables,
}

/// Snapshot written next to the bitmap and sent as the `data` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Snapshot {
    pub name: String,
    pub description: String,
    pub status: String,
    pub reward_text: String,
    pub total_wanted: u64,
    pub attribution: String,
    pub last_update: String,
    #[serde(rename = "QRCodeURL")]
    pub qr_code_url: Option<String>,
    #[serde(rename = "ImageURL")]
    pub image_url: Option<String>,
    #[serde(rename = "DetailURL")]
    pub detail_url: Option<String>,
}

impl Snapshot {
    pub const ATTRIBUTION: &'static str = "Data provided by FBI.gov";
    const NO_REWARD: &'static str = "No reward information available";

    pub fn new(wanted: &Wanted, qr_code_url: Option<String>) -> Self {
        let record = &wanted.record;
        let reward_text = if record.reward_text.is_empty() {
            Self::NO_REWARD.to_string()
        } else {
            record.reward_text.clone()
        };

        Self {
            name: record.title.clone(),
            description: record.description.clone(),
            status: record.display_status().to_string(),
            reward_text,
            total_wanted: wanted.total,
            attribution: Self::ATTRIBUTION.to_string(),
            last_update: wanted.fetched_at.to_rfc3339(),
            qr_code_url,
            image_url: record.image_url.clone(),
            detail_url: record.detail_url.clone(),
        }
    }
}
