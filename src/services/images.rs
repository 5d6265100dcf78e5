// src/services/images.rs

//! Photo retrieval strategies.
//!
//! The source site blocks most non-browser clients, so photos can be pulled
//! through proxy passthrough hosts. Each strategy is fallible and reports
//! failure as `None`; the renderer draws a placeholder instead.

use image::DynamicImage;
use reqwest::blocking::Client;

use crate::error::{AppError, Result};
use crate::models::ImageConfig;
use crate::utils::http::{create_client, fetch_bytes};
use crate::utils::url::proxy_url;

/// A way of turning an image URL into decoded pixels.
pub trait ImageSource {
    /// Short label used in logs.
    fn name(&self) -> &str;

    fn fetch(&self, url: &str) -> Option<DynamicImage>;
}

/// Plain GET against the image host.
pub struct DirectSource {
    client: Client,
}

impl DirectSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ImageSource for DirectSource {
    fn name(&self) -> &str {
        "direct"
    }

    fn fetch(&self, url: &str) -> Option<DynamicImage> {
        log::info!("Fetching image directly: {}", url);
        decode(fetch_bytes(&self.client, url, "direct image"))
    }
}

/// Passthrough proxies, tried in order.
pub struct ProxySource {
    client: Client,
    hosts: Vec<String>,
}

impl ProxySource {
    pub fn new(client: Client, hosts: Vec<String>) -> Self {
        Self { client, hosts }
    }
}

impl ImageSource for ProxySource {
    fn name(&self) -> &str {
        "proxy"
    }

    fn fetch(&self, url: &str) -> Option<DynamicImage> {
        for host in &self.hosts {
            let Some(target) = proxy_url(host, url) else {
                log::warn!("Skipping invalid proxy host {}", host);
                continue;
            };
            log::info!("Attempting to fetch image via proxy: {}", target);
            if let Some(image) = decode(fetch_bytes(&self.client, &target, "image proxy")) {
                log::info!("Fetched image via {}", host);
                return Some(image);
            }
        }
        log::error!("All {} proxy attempts failed for {}", self.hosts.len(), url);
        None
    }
}

/// Ordered list of strategies; the first success wins.
#[derive(Default)]
pub struct ImageChain {
    sources: Vec<Box<dyn ImageSource>>,
}

impl ImageChain {
    pub fn new(sources: Vec<Box<dyn ImageSource>>) -> Self {
        Self { sources }
    }

    /// Build the chain named by `images.strategies`.
    pub fn from_config(config: &ImageConfig) -> Result<Self> {
        let client = create_client(&config.user_agent, config.timeout_secs)?;
        let mut sources: Vec<Box<dyn ImageSource>> = Vec::new();

        for strategy in &config.strategies {
            match strategy.as_str() {
                "direct" => sources.push(Box::new(DirectSource::new(client.clone()))),
                "proxy" => sources.push(Box::new(ProxySource::new(
                    client.clone(),
                    config.proxy_hosts.clone(),
                ))),
                other => {
                    return Err(AppError::config(format!(
                        "unknown image strategy '{other}'"
                    )));
                }
            }
        }
        Ok(Self::new(sources))
    }
}

impl ImageSource for ImageChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn fetch(&self, url: &str) -> Option<DynamicImage> {
        self.sources.iter().find_map(|source| {
            let image = source.fetch(url);
            if image.is_none() {
                log::warn!("Image strategy '{}' failed for {}", source.name(), url);
            }
            image
        })
    }
}

fn decode(bytes: Result<Vec<u8>>) -> Option<DynamicImage> {
    let bytes = bytes
        .map_err(|e| log::warn!("Image request failed: {}", e))
        .ok()?;
    image::load_from_memory(&bytes)
        .map_err(|e| log::warn!("Image decode failed: {}", e))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Fixed {
        hits: Cell<usize>,
        image: Option<DynamicImage>,
    }

    impl ImageSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(&self, _url: &str) -> Option<DynamicImage> {
            self.hits.set(self.hits.get() + 1);
            self.image.clone()
        }
    }

    #[test]
    fn test_chain_stops_at_first_success() {
        let chain = ImageChain::new(vec![
            Box::new(Fixed {
                hits: Cell::new(0),
                image: None,
            }),
            Box::new(Fixed {
                hits: Cell::new(0),
                image: Some(DynamicImage::new_luma8(4, 4)),
            }),
        ]);
        let image = chain.fetch("https://example.com/a.jpg").unwrap();
        assert_eq!(image.width(), 4);
    }

    #[test]
    fn test_empty_chain_yields_none() {
        assert!(ImageChain::default().fetch("https://example.com/a.jpg").is_none());
    }

    #[test]
    fn test_from_config_rejects_unknown_strategy() {
        let config = ImageConfig {
            strategies: vec!["browser".to_string()],
            ..ImageConfig::default()
        };
        assert!(ImageChain::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_builds_in_order() {
        let config = ImageConfig {
            strategies: vec!["direct".to_string(), "proxy".to_string()],
            ..ImageConfig::default()
        };
        let chain = ImageChain::from_config(&config).unwrap();
        assert_eq!(chain.sources.len(), 2);
        assert_eq!(chain.sources[0].name(), "direct");
        assert_eq!(chain.sources[1].name(), "proxy");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode(Ok(b"not an image".to_vec())).is_none());
        assert!(decode(Err(AppError::network("x", "y"))).is_none());
    }
}
