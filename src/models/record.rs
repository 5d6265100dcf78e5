//! Display-ready record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A wanted-person record normalized for display.
///
/// Every text field carries a concrete value; only the two links are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationRecord {
    pub title: String,
    /// Free text; may hold a `date\r\nlocation` pair
    pub description: String,
    /// Long-form caution text with markup removed
    pub details: String,
    pub subjects: String,
    pub race: String,
    pub sex: String,
    pub nationality: String,
    pub hair: String,
    pub eyes: String,
    /// `"<min>-<max>"` in inches, or `"Unknown"`
    pub height: String,
    pub dates_of_birth: String,
    pub languages: String,
    pub scars_and_marks: String,
    pub status: String,
    pub reward_text: String,
    pub warning_message: String,
    pub image_url: Option<String>,
    pub detail_url: Option<String>,
}

impl Default for PresentationRecord {
    fn default() -> Self {
        let unknown = || PresentationRecord::UNKNOWN.to_string();
        Self {
            title: unknown(),
            description: String::new(),
            details: String::new(),
            subjects: unknown(),
            race: unknown(),
            sex: unknown(),
            nationality: unknown(),
            hair: unknown(),
            eyes: unknown(),
            height: unknown(),
            dates_of_birth: unknown(),
            languages: unknown(),
            scars_and_marks: PresentationRecord::NO_SCARS.to_string(),
            status: String::new(),
            reward_text: String::new(),
            warning_message: String::new(),
            image_url: None,
            detail_url: None,
        }
    }
}

impl PresentationRecord {
    pub const UNKNOWN: &'static str = "Unknown";
    pub const NO_SCARS: &'static str = "None reported";

    /// Split the description into its date and location halves.
    ///
    /// Only a description of exactly two `\r\n`-separated parts qualifies.
    pub fn date_and_location(&self) -> Option<(&str, &str)> {
        let mut parts = self.description.split("\r\n");
        let date = parts.next()?;
        let location = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        Some((date.trim(), location.trim()))
    }

    /// Status for display, falling back to "WANTED".
    pub fn display_status(&self) -> &str {
        if self.status.is_empty() || self.status.eq_ignore_ascii_case("na") {
            "WANTED"
        } else {
            &self.status
        }
    }
}

/// Listing-level facts shown alongside the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMeta {
    /// Total records the listing reported
    pub total: u64,
    /// When the listing was fetched
    pub timestamp: DateTime<Utc>,
}

/// One fetched-and-selected record together with its listing facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wanted {
    pub total: u64,
    pub fetched_at: DateTime<Utc>,
    pub record: PresentationRecord,
}

impl Wanted {
    pub fn meta(&self) -> DisplayMeta {
        DisplayMeta {
            total: self.total,
            timestamp: self.fetched_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_and_location_two_parts() {
        let record = PresentationRecord {
            description: "05/01/2020\r\nMiami, FL".to_string(),
            ..Default::default()
        };
        assert_eq!(record.date_and_location(), Some(("05/01/2020", "Miami, FL")));
    }

    #[test]
    fn test_date_and_location_other_shapes() {
        let mut record = PresentationRecord::default();
        assert_eq!(record.date_and_location(), None);

        record.description = "one\r\ntwo\r\nthree".to_string();
        assert_eq!(record.date_and_location(), None);

        record.description = "no marker here".to_string();
        assert_eq!(record.date_and_location(), None);
    }

    #[test]
    fn test_display_status() {
        let mut record = PresentationRecord::default();
        assert_eq!(record.display_status(), "WANTED");
        record.status = "captured".to_string();
        assert_eq!(record.display_status(), "captured");
    }
}
