// src/config.rs

//! Configuration loading utilities.
//!
//! Combines the TOML file with the credentials and switches taken from the
//! environment.

use std::path::Path;

use crate::error::Result;
use crate::models::{Config, Credentials};

/// Everything a run needs to know before it starts.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub credentials: Credentials,
}

impl Settings {
    /// Load `path` (defaults when it does not exist) plus the process environment.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`Settings::load`] with an explicit environment lookup.
    ///
    /// A file that exists but does not parse is an error rather than a silent
    /// fallback to defaults.
    pub fn load_with(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = if path.exists() {
            log::info!("Loading configuration from {}", path.display());
            Config::load(path)?
        } else {
            log::info!("No configuration at {}; using defaults", path.display());
            Config::default()
        };
        config.validate()?;

        Ok(Self {
            config,
            credentials: Credentials::from_lookup(lookup),
        })
    }
}
