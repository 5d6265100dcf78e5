// src/services/publisher.rs

//! Webhook publisher for the display service.

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};

use crate::error::{AppError, Result};
use crate::models::{MergeBody, MergeVariables, PublishConfig, Snapshot};
use crate::utils::http::create_client;

const USER_AGENT: &str = "TRMNL-FBI-Plugin/1.0";

/// Posts rendered output to a plugin's webhook.
pub struct Publisher {
    client: Client,
    endpoint: String,
}

impl Publisher {
    /// Publisher for the plugin `plugin_uuid` under the configured base URL.
    pub fn new(config: &PublishConfig, plugin_uuid: &str) -> Result<Self> {
        Ok(Self {
            client: create_client(USER_AGENT, config.timeout_secs)?,
            endpoint: format!("{}/{}", config.base_url.trim_end_matches('/'), plugin_uuid),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload the bitmap as the `image` part with the snapshot JSON as `data`.
    pub fn publish_image(&self, bitmap: Vec<u8>, snapshot: &Snapshot, api_key: &str) -> Result<()> {
        let image = Part::bytes(bitmap)
            .file_name("image.bmp")
            .mime_str("image/bmp")?;
        let form = Form::new()
            .part("image", image)
            .text("data", serde_json::to_string(snapshot)?);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .multipart(form)
            .send()?;
        Self::check(response)?;

        log::info!("Uploaded display image to {}", self.endpoint);
        Ok(())
    }

    /// Post merge variables as a JSON body.
    pub fn publish_merge_variables(&self, variables: &MergeVariables) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&MergeBody {
                merge_variables: variables,
            })
            .send()?;
        Self::check(response)?;

        log::info!("Sent merge variables to {}", self.endpoint);
        Ok(())
    }

    fn check(response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().unwrap_or_default();
        Err(AppError::publish(status.as_u16(), body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_uuid() {
        let config = PublishConfig {
            base_url: "https://usetrmnl.com/api/custom_plugins/".to_string(),
            ..PublishConfig::default()
        };
        let publisher = Publisher::new(&config, "abc-123").unwrap();
        assert_eq!(
            publisher.endpoint(),
            "https://usetrmnl.com/api/custom_plugins/abc-123"
        );
    }
}
