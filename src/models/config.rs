//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Listing API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Photo retrieval settings
    #[serde(default)]
    pub images: ImageConfig,

    /// Canvas settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// In-memory cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Webhook settings
    #[serde(default)]
    pub publish: PublishConfig,

    /// Local artifact settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Development server settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::config("api.base_url is empty"));
        }
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::config("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::config("api.timeout_secs must be > 0"));
        }
        if self.images.timeout_secs == 0 {
            return Err(AppError::config("images.timeout_secs must be > 0"));
        }
        for strategy in &self.images.strategies {
            if !matches!(strategy.as_str(), "direct" | "proxy") {
                return Err(AppError::config(format!(
                    "images.strategies contains unknown strategy '{strategy}'"
                )));
            }
        }
        if self.images.strategies.iter().any(|s| s == "proxy") && self.images.proxy_hosts.is_empty()
        {
            return Err(AppError::config(
                "images.proxy_hosts is empty but the proxy strategy is enabled",
            ));
        }
        if self.display.width < 400 || self.display.height < 240 {
            return Err(AppError::config(
                "display must be at least 400x240 to fit the layout",
            ));
        }
        if self.cache.ttl_secs == 0 {
            return Err(AppError::config("cache.ttl_secs must be > 0"));
        }
        if self.publish.base_url.trim().is_empty() {
            return Err(AppError::config("publish.base_url is empty"));
        }
        Ok(())
    }
}

/// Record selection policy applied to the full listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Uniformly random pick
    #[default]
    Random,
    /// Always the first item
    First,
}

/// Listing API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Listing endpoint
    #[serde(default = "defaults::api_base_url")]
    pub base_url: String,

    /// User-Agent header for listing requests
    #[serde(default = "defaults::api_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Which record to show
    #[serde(default)]
    pub selection: Selection,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::api_base_url(),
            user_agent: defaults::api_user_agent(),
            timeout_secs: defaults::timeout(),
            selection: Selection::default(),
        }
    }
}

/// Photo retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Ordered retrieval strategies: "direct", "proxy"
    #[serde(default = "defaults::image_strategies")]
    pub strategies: Vec<String>,

    /// Proxy hosts tried in order, each taking `?url=<encoded target>`
    #[serde(default = "defaults::proxy_hosts")]
    pub proxy_hosts: Vec<String>,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::image_timeout")]
    pub timeout_secs: u64,

    /// Browser-like User-Agent for image hosts
    #[serde(default = "defaults::image_user_agent")]
    pub user_agent: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            strategies: defaults::image_strategies(),
            proxy_hosts: defaults::proxy_hosts(),
            timeout_secs: defaults::image_timeout(),
            user_agent: defaults::image_user_agent(),
        }
    }
}

/// Canvas settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "defaults::width")]
    pub width: u32,

    #[serde(default = "defaults::height")]
    pub height: u32,

    /// TrueType font to use instead of the embedded one
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: defaults::width(),
            height: defaults::height(),
            font_path: None,
        }
    }
}

/// In-memory cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a fetched record stays valid
    #[serde(default = "defaults::ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: defaults::ttl(),
        }
    }
}

/// Webhook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Webhook base; the plugin UUID is appended as the last path segment
    #[serde(default = "defaults::publish_base_url")]
    pub base_url: String,

    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::publish_base_url(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Local artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write artifacts at all
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    #[serde(default = "defaults::output_dir")]
    pub dir: PathBuf,

    #[serde(default = "defaults::snapshot_file")]
    pub snapshot_file: String,

    #[serde(default = "defaults::bitmap_file")]
    pub bitmap_file: String,

    #[serde(default = "defaults::qr_file")]
    pub qr_file: String,

    /// Branch used when building public raw-asset URLs
    #[serde(default = "defaults::branch")]
    pub branch: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::enabled(),
            dir: defaults::output_dir(),
            snapshot_file: defaults::snapshot_file(),
            bitmap_file: defaults::bitmap_file(),
            qr_file: defaults::qr_file(),
            branch: defaults::branch(),
        }
    }
}

/// Development server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default = "defaults::port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
        }
    }
}

/// Secrets and deployment switches read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// `TRMNL_PLUGIN_UUID`
    pub plugin_uuid: Option<String>,
    /// `TRMNL_API_KEY`
    pub api_key: Option<String>,
    /// `DEBUG`
    pub debug: bool,
    /// `GITHUB_REPOSITORY`, e.g. `owner/repo`
    pub repository: Option<String>,
}

impl Credentials {
    pub const PLUGIN_UUID_VAR: &'static str = "TRMNL_PLUGIN_UUID";
    pub const API_KEY_VAR: &'static str = "TRMNL_API_KEY";
    pub const DEBUG_VAR: &'static str = "DEBUG";
    pub const REPOSITORY_VAR: &'static str = "GITHUB_REPOSITORY";

    /// Read credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary lookup; blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            plugin_uuid: get(Self::PLUGIN_UUID_VAR),
            api_key: get(Self::API_KEY_VAR),
            debug: get(Self::DEBUG_VAR).is_some_and(|v| is_truthy(&v)),
            repository: get(Self::REPOSITORY_VAR),
        }
    }

    /// The plugin identifier, required by every publish variant.
    pub fn require_plugin_uuid(&self) -> Result<&str> {
        self.plugin_uuid
            .as_deref()
            .ok_or_else(|| AppError::config(format!("{} is not set", Self::PLUGIN_UUID_VAR)))
    }

    /// The bearer credential, required by the upload variant.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::config(format!("{} is not set", Self::API_KEY_VAR)))
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

mod defaults {
    use std::path::PathBuf;

    // Listing defaults
    pub fn api_base_url() -> String {
        "https://api.fbi.gov/wanted/v1/list".into()
    }
    pub fn api_user_agent() -> String {
        "TRMNL-FBI-Plugin/1.0".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Image defaults
    pub fn image_strategies() -> Vec<String> {
        vec!["proxy".into()]
    }
    pub fn proxy_hosts() -> Vec<String> {
        vec![
            "https://wsrv.nl/".into(),
            "https://images.weserv.nl/".into(),
        ]
    }
    pub fn image_timeout() -> u64 {
        15
    }
    pub fn image_user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into()
    }

    // Display defaults
    pub fn width() -> u32 {
        800
    }
    pub fn height() -> u32 {
        480
    }

    // Cache defaults
    pub fn ttl() -> u64 {
        300
    }

    // Publish defaults
    pub fn publish_base_url() -> String {
        "https://usetrmnl.com/api/custom_plugins".into()
    }

    // Output defaults
    pub fn enabled() -> bool {
        true
    }
    pub fn output_dir() -> PathBuf {
        PathBuf::from("data")
    }
    pub fn snapshot_file() -> String {
        "current_wanted.json".into()
    }
    pub fn bitmap_file() -> String {
        "display.bmp".into()
    }
    pub fn qr_file() -> String {
        "wanted_qr.png".into()
    }
    pub fn branch() -> String {
        "main".into()
    }

    // Server defaults
    pub fn host() -> String {
        "127.0.0.1".into()
    }
    pub fn port() -> u16 {
        8080
    }
}
