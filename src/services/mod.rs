//! Service layer for the display pipeline.
//!
//! This module contains the business logic for:
//! - Listing retrieval and record selection (`Fetcher`)
//! - TTL caching of the selected record (`WantedCache`)
//! - Raw-to-display record mapping (`formatter`)
//! - Photo retrieval strategies (`ImageChain`)
//! - Webhook delivery (`Publisher`)

pub mod cache;
pub mod fetcher;
pub mod formatter;
pub mod images;
mod publisher;

pub use cache::{Clock, SystemClock, WantedCache};
pub use fetcher::{Fetcher, ListingApi, ListingSource, WantedSource};
pub use images::{DirectSource, ImageChain, ImageSource, ProxySource};
pub use publisher::Publisher;
