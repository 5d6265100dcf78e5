// src/models/mod.rs

//! Domain models for the display pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod listing;
mod payload;
mod record;

// Re-export all public types
pub use config::{
    ApiConfig, CacheConfig, Config, Credentials, DisplayConfig, ImageConfig, OutputConfig,
    PublishConfig, Selection, ServerConfig,
};
pub use listing::{ListingPage, RawRecord};
pub use payload::{MergeBody, MergeVariables, Snapshot};
pub use record::{DisplayMeta, PresentationRecord, Wanted};
