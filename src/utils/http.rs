// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::blocking::{Client, Response};

use crate::error::{AppError, Result};

/// Create a configured blocking HTTP client.
pub fn create_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Turn a non-2xx response into a network error.
pub fn ensure_success(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(AppError::network(context, format!("status {status}")))
    }
}

/// GET `url` and return the body bytes of a 2xx response.
pub fn fetch_bytes(client: &Client, url: &str, context: &str) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| AppError::network(context, e))?;
    let response = ensure_success(response, context)?;
    let bytes = response.bytes().map_err(|e| AppError::network(context, e))?;
    Ok(bytes.to_vec())
}
