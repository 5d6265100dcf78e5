// src/storage/local.rs

//! Local filesystem storage implementation.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── current_wanted.json   # Snapshot of the displayed record
//! ├── display.bmp           # Rendered 1-bit bitmap
//! └── wanted_qr.png         # QR code for the detail page
//! ```
//!
//! File names come from `[output]` in the configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{AppError, Result};
use crate::models::{OutputConfig, Snapshot};
use crate::storage::ArtifactStorage;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    snapshot_file: String,
    bitmap_file: String,
    qr_file: String,
}

impl LocalStorage {
    /// Create a LocalStorage using the configured directory and file names.
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            root_dir: config.dir.clone(),
            snapshot_file: config.snapshot_file.clone(),
            bitmap_file: config.bitmap_file.clone(),
            qr_file: config.qr_file.clone(),
        }
    }

    /// Same file names as `config`, rooted at `root_dir`.
    pub fn with_root(root_dir: impl Into<PathBuf>, config: &OutputConfig) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::new(config)
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a relative key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(key);
        self.ensure_dir(&path)?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<PathBuf> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes)
    }

    /// Read bytes, returning None if file doesn't exist.
    fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

impl ArtifactStorage for LocalStorage {
    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        self.write_json(&self.snapshot_file, snapshot)
    }

    fn write_bitmap(&self, bitmap: &[u8]) -> Result<PathBuf> {
        self.write_bytes(&self.bitmap_file, bitmap)
    }

    fn write_qr(&self, png: &[u8]) -> Result<PathBuf> {
        self.write_bytes(&self.qr_file, png)
    }

    fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        self.read_json(&self.snapshot_file)
    }
}
