//! Storage abstractions for rendered artifacts.
//!
//! Each run leaves behind three files that a static host or the development
//! server can serve:
//! - the snapshot JSON describing the displayed record
//! - the 1-bit bitmap pushed to the device
//! - a QR code PNG linking to the record's detail page

pub mod local;

use std::path::PathBuf;

use crate::error::Result;
use crate::models::Snapshot;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for artifact storage backends.
///
/// Writes replace the previous artifact atomically and return its location.
pub trait ArtifactStorage {
    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<PathBuf>;

    fn write_bitmap(&self, bitmap: &[u8]) -> Result<PathBuf>;

    fn write_qr(&self, png: &[u8]) -> Result<PathBuf>;

    /// Load the last snapshot, if one was written.
    fn load_snapshot(&self) -> Result<Option<Snapshot>>;
}
