//! Raw listing API payloads.
//!
//! The upstream schema is not guaranteed, so records are kept as loose JSON
//! maps and every accessor degrades to `None` instead of failing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One page of the listing API response.
///
/// Unexpected shapes in the envelope degrade instead of failing the page:
/// a missing or non-numeric `total` reads as 0, and non-object entries in
/// `items` are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingPage {
    /// Total number of records across all pages
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,

    /// Records on this page
    #[serde(default, deserialize_with = "object_items")]
    pub items: Vec<RawRecord>,

    /// Page number echoed by the API
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: Option<u64>,
}

fn count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(count(&Value::deserialize(deserializer)?).unwrap_or(0))
}

fn lenient_page<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(count(&Value::deserialize(deserializer)?))
}

fn object_items<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RawRecord>, D::Error> {
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    let skipped = items.iter().filter(|item| !item.is_object()).count();
    if skipped > 0 {
        log::warn!("Skipping {} malformed listing entries", skipped);
    }
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(RawRecord(map)),
            _ => None,
        })
        .collect())
}

/// A single record exactly as the API returned it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(pub Map<String, Value>);

impl RawRecord {
    /// Non-empty string value of `key`.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// String items of a list-valued `key`; scalars are treated as one-item lists.
    pub fn list_field(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
            _ => Vec::new(),
        }
    }

    /// Numeric value of `key`, accepting numbers and numeric strings.
    pub fn num_field(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Image variants attached to the record.
    pub fn images(&self) -> Vec<&Map<String, Value>> {
        match self.0.get("images") {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}
