// src/services/cache.rs

//! In-memory TTL cache in front of a [`WantedSource`].
//!
//! Only dedupes calls inside one long-lived process; nothing is persisted.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Wanted;
use crate::services::fetcher::WantedSource;

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A cached value and when it was stored.
#[derive(Debug, Clone)]
struct CacheEntry {
    wanted: Wanted,
    stored_at: DateTime<Utc>,
}

/// TTL cache for the selected record.
pub struct WantedCache<S, C = SystemClock> {
    source: S,
    clock: C,
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl<S: WantedSource> WantedCache<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self::with_clock(source, ttl, SystemClock)
    }
}

impl<S: WantedSource, C: Clock> WantedCache<S, C> {
    pub fn with_clock(source: S, ttl: Duration, clock: C) -> Self {
        Self {
            source,
            clock,
            ttl,
            entry: None,
        }
    }

    /// Return the cached record while it is younger than the TTL, else refresh.
    ///
    /// A failed refresh keeps the previous entry and serves it; the error only
    /// surfaces when nothing has been cached yet.
    pub fn get(&mut self) -> Result<Wanted> {
        let now = self.clock.now();
        if let Some(entry) = &self.entry {
            if self.is_fresh(entry, now) {
                log::debug!("Serving cached record from {}", entry.stored_at);
                return Ok(entry.wanted.clone());
            }
        }

        match self.source.fetch_wanted() {
            Ok(wanted) => {
                self.entry = Some(CacheEntry {
                    wanted: wanted.clone(),
                    stored_at: now,
                });
                Ok(wanted)
            }
            Err(e) => match &self.entry {
                Some(entry) => {
                    log::warn!(
                        "Refresh failed ({}); serving record cached at {}",
                        e,
                        entry.stored_at
                    );
                    Ok(entry.wanted.clone())
                }
                None => Err(e),
            },
        }
    }

    /// When the cache last refreshed successfully.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|e| e.stored_at)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        match (now - entry.stored_at).to_std() {
            Ok(age) => age < self.ttl,
            // Clock went backwards; treat the entry as just stored.
            Err(_) => true,
        }
    }
}
