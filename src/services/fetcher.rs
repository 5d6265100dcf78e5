// src/services/fetcher.rs

//! Listing API client and record selection.
//!
//! The API is paged, so a cheap probe (`per_page=1`) learns the total first
//! and a second call asks for every record in a single page.

use chrono::Utc;
use rand::seq::SliceRandom;
use reqwest::blocking::Client;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, ListingPage, RawRecord, Selection, Wanted};
use crate::services::formatter;
use crate::utils::http::{create_client, ensure_success};

/// Anything that can return one page of the listing.
pub trait ListingSource {
    fn fetch_page(&self, page: u64, per_page: u64) -> Result<ListingPage>;

    /// Probe for the total, then request every record in one page.
    fn fetch_all(&self) -> Result<ListingPage> {
        let probe = self.fetch_page(1, 1)?;
        if probe.total == 0 {
            return Err(AppError::no_data("listing reported 0 records"));
        }
        log::debug!("Listing reports {} records", probe.total);

        let mut full = self.fetch_page(1, probe.total)?;
        if full.total == 0 {
            full.total = probe.total;
        }
        Ok(full)
    }
}

/// Anything that can produce the record to display.
pub trait WantedSource {
    fn fetch_wanted(&self) -> Result<Wanted>;
}

/// Blocking client for the remote listing API.
pub struct ListingApi {
    client: Client,
    base_url: String,
}

impl ListingApi {
    /// Create a new API client with the given configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(&config.user_agent, config.timeout_secs)?,
            base_url: config.base_url.clone(),
        })
    }
}

impl ListingSource for ListingApi {
    fn fetch_page(&self, page: u64, per_page: u64) -> Result<ListingPage> {
        let context = format!("listing page={page} per_page={per_page}");
        let response = self
            .client
            .get(&self.base_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("page", page), ("per_page", per_page)])
            .send()
            .map_err(|e| AppError::network(&context, e))?;
        let response = ensure_success(response, &context)?;
        let body = response.text().map_err(|e| AppError::network(&context, e))?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Choose exactly one record from the listing.
pub fn select(items: Vec<RawRecord>, selection: Selection) -> Result<RawRecord> {
    let picked = match selection {
        Selection::First => items.into_iter().next(),
        Selection::Random => items.choose(&mut rand::thread_rng()).cloned(),
    };
    picked.ok_or_else(|| AppError::no_data("listing returned no items"))
}

/// Fetch → select → format, producing one [`Wanted`] snapshot.
pub struct Fetcher<S> {
    source: S,
    selection: Selection,
}

impl<S: ListingSource> Fetcher<S> {
    pub fn new(source: S, selection: Selection) -> Self {
        Self { source, selection }
    }
}

impl Fetcher<ListingApi> {
    /// Fetcher backed by the real listing API.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(ListingApi::new(config)?, config.selection))
    }
}

impl<S: ListingSource> WantedSource for Fetcher<S> {
    fn fetch_wanted(&self) -> Result<Wanted> {
        let page = self.source.fetch_all()?;
        let total = page.total;
        let available = page.items.len();

        let raw = select(page.items, self.selection)?;
        let record = formatter::format(&raw);
        log::info!(
            "Selected \"{}\" from {} fetched records ({} total)",
            record.title,
            available,
            total
        );

        Ok(Wanted {
            total,
            fetched_at: Utc::now(),
            record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    /// Serves canned pages and records each request.
    struct StubSource {
        total: u64,
        items: Vec<RawRecord>,
        calls: RefCell<Vec<(u64, u64)>>,
        fail: bool,
    }

    impl StubSource {
        fn new(total: u64, titles: &[&str]) -> Self {
            Self {
                total,
                items: titles
                    .iter()
                    .map(|t| RawRecord::from(json!({ "title": t })))
                    .collect(),
                calls: RefCell::new(Vec::new()),
                fail: false,
            }
        }
    }

    impl ListingSource for StubSource {
        fn fetch_page(&self, page: u64, per_page: u64) -> Result<ListingPage> {
            self.calls.borrow_mut().push((page, per_page));
            if self.fail {
                return Err(AppError::network("stub", "status 500"));
            }
            Ok(ListingPage {
                total: self.total,
                items: self.items.iter().take(per_page as usize).cloned().collect(),
                page: Some(page),
            })
        }
    }

    #[test]
    fn test_fetch_all_probes_then_requests_total() {
        let source = StubSource::new(3, &["A", "B", "C"]);
        let page = source.fetch_all().unwrap();

        assert_eq!(page.items.len(), 3);
        assert_eq!(*source.calls.borrow(), vec![(1, 1), (1, 3)]);
    }

    #[test]
    fn test_fetch_all_zero_total_is_no_data() {
        let source = StubSource::new(0, &[]);
        assert!(matches!(source.fetch_all(), Err(AppError::NoData(_))));
        assert_eq!(source.calls.borrow().len(), 1);
    }

    #[test]
    fn test_fetch_failure_returns_nothing() {
        let mut source = StubSource::new(3, &["A"]);
        source.fail = true;
        let fetcher = Fetcher::new(source, Selection::First);
        let err = fetcher.fetch_wanted().unwrap_err();
        assert!(err.is_network());
    }

    #[test]
    fn test_select_first() {
        let items = vec![
            RawRecord::from(json!({"title": "A"})),
            RawRecord::from(json!({"title": "B"})),
        ];
        let picked = select(items, Selection::First).unwrap();
        assert_eq!(picked.str_field("title"), Some("A"));
    }

    #[test]
    fn test_select_random_stays_in_set() {
        let items: Vec<RawRecord> = ["A", "B", "C"]
            .iter()
            .map(|t| RawRecord::from(json!({ "title": t })))
            .collect();
        for _ in 0..20 {
            let picked = select(items.clone(), Selection::Random).unwrap();
            assert!(matches!(picked.str_field("title"), Some("A" | "B" | "C")));
        }
    }

    #[test]
    fn test_select_empty_is_no_data() {
        assert!(matches!(
            select(Vec::new(), Selection::Random),
            Err(AppError::NoData(_))
        ));
    }

    #[test]
    fn test_fetcher_formats_selected_record() {
        let source = StubSource::new(2, &["JOHN DOE", "JANE ROE"]);
        let wanted = Fetcher::new(source, Selection::First).fetch_wanted().unwrap();
        assert_eq!(wanted.total, 2);
        assert_eq!(wanted.record.title, "JOHN DOE");
        assert_eq!(wanted.record.subjects, "Unknown");
    }
}
