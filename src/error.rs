// src/error.rs

//! Unified error handling for the display pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A listing, image or proxy call failed or answered non-2xx
    #[error("Network error for {context}: {message}")]
    Network { context: String, message: String },

    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The listing came back without any record to show
    #[error("No data: {0}")]
    NoData(String),

    /// Missing credential or invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Compositing the canvas failed
    #[error("Render error: {0}")]
    Render(String),

    /// The webhook rejected the update
    #[error("Publish failed with status {status}: {body}")]
    Publish { status: u16, body: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Image decoding/encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl AppError {
    /// Create a network error with context.
    pub fn network(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Network {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a no-data error.
    pub fn no_data(message: impl Into<String>) -> Self {
        Self::NoData(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a render error.
    pub fn render(message: impl fmt::Display) -> Self {
        Self::Render(message.to_string())
    }

    /// Create a publish error from a rejected webhook response.
    pub fn publish(status: u16, body: impl Into<String>) -> Self {
        Self::Publish {
            status,
            body: body.into(),
        }
    }

    /// Whether this error belongs to the network family (listing, image, webhook transport).
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Http(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_message() {
        let err = AppError::network("listing probe", "status 503");
        assert_eq!(err.to_string(), "Network error for listing probe: status 503");
        assert!(err.is_network());
    }

    #[test]
    fn test_publish_error_message() {
        let err = AppError::publish(401, "unauthorized");
        assert_eq!(err.to_string(), "Publish failed with status 401: unauthorized");
        assert!(!err.is_network());
    }
}
