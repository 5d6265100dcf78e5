// src/pipeline/run.rs

//! One-shot runs: fetch a record, render it, store and publish the result.

use std::path::PathBuf;

use crate::error::Result;
use crate::models::{Config, Credentials, MergeVariables, OutputConfig, Snapshot, Wanted};
use crate::render::Renderer;
use crate::services::{Fetcher, ImageChain, Publisher, WantedSource};
use crate::storage::{ArtifactStorage, LocalStorage};
use crate::utils::log;
use crate::utils::url::asset_url;

/// Output of rendering one record.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub bitmap: Vec<u8>,
    /// PNG of the detail-page QR code; absent without a detail URL
    pub qr_png: Option<Vec<u8>>,
    pub snapshot: Snapshot,
}

/// What a run did, for logging and tests.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub wanted: Wanted,
    pub written: Vec<PathBuf>,
    /// Webhook endpoint the result was sent to
    pub published_to: Option<String>,
}

impl RunReport {
    fn log_summary(&self, title: &str) {
        log::summary(
            title,
            &[
                ("Name", self.wanted.record.title.clone()),
                ("Total wanted", self.wanted.total.to_string()),
                ("Artifacts written", self.written.len().to_string()),
                (
                    "Published to",
                    self.published_to.clone().unwrap_or_else(|| "-".to_string()),
                ),
            ],
        );
    }
}

/// Public location of the QR artifact for `wanted`, if it gets one.
///
/// With a repository configured this is a raw-content URL into it,
/// otherwise the bare file name relative to the output directory.
pub fn qr_code_url(output: &OutputConfig, credentials: &Credentials, wanted: &Wanted) -> Option<String> {
    wanted.record.detail_url.as_ref()?;
    let url = match &credentials.repository {
        Some(repository) => asset_url(
            repository,
            &output.branch,
            &output.dir.to_string_lossy(),
            &output.qr_file,
        ),
        None => output.qr_file.clone(),
    };
    Some(url)
}

/// Renderer with the configured image strategies.
pub fn build_renderer(config: &Config) -> Result<Renderer> {
    let images = ImageChain::from_config(&config.images)?;
    Renderer::new(&config.display, Box::new(images))
}

/// Render the bitmap, QR code and snapshot for `wanted`.
pub fn render_wanted(renderer: &Renderer, wanted: &Wanted, qr_code_url: Option<String>) -> Rendered {
    let bitmap = renderer.render(&wanted.record, &wanted.meta());
    let qr_png = wanted
        .record
        .detail_url
        .as_deref()
        .and_then(|url| match renderer.qr_png(url) {
            Ok(png) => Some(png),
            Err(e) => {
                ::log::warn!("Could not generate QR code: {}", e);
                None
            }
        });

    Rendered {
        bitmap,
        qr_png,
        snapshot: Snapshot::new(wanted, qr_code_url),
    }
}

/// Write every artifact of `rendered`; returns the written paths.
pub fn write_artifacts(storage: &dyn ArtifactStorage, rendered: &Rendered) -> Result<Vec<PathBuf>> {
    match storage.load_snapshot() {
        Ok(Some(previous)) if previous.name != rendered.snapshot.name => {
            ::log::info!("Replacing {} with {}", previous.name, rendered.snapshot.name);
        }
        Ok(_) => {}
        Err(e) => ::log::warn!("Ignoring unreadable previous snapshot: {}", e),
    }

    let mut written = vec![
        storage.write_snapshot(&rendered.snapshot)?,
        storage.write_bitmap(&rendered.bitmap)?,
    ];
    if let Some(png) = &rendered.qr_png {
        written.push(storage.write_qr(png)?);
    }
    for path in &written {
        ::log::info!("Saved {}", path.display());
    }
    Ok(written)
}

fn fetch(config: &Config) -> Result<Wanted> {
    Fetcher::from_config(&config.api)?.fetch_wanted()
}

fn render_and_store(
    config: &Config,
    credentials: &Credentials,
    wanted: &Wanted,
) -> Result<(Rendered, Vec<PathBuf>)> {
    let renderer = build_renderer(config)?;
    let rendered = render_wanted(&renderer, wanted, qr_code_url(&config.output, credentials, wanted));

    let written = if config.output.enabled {
        write_artifacts(&LocalStorage::new(&config.output), &rendered)?
    } else {
        ::log::debug!("Artifact output disabled");
        Vec::new()
    };
    Ok((rendered, written))
}

/// Fetch, render, store and upload the bitmap to the plugin webhook.
///
/// Credentials are checked before any network traffic.
pub fn run_push(config: &Config, credentials: &Credentials) -> Result<RunReport> {
    const STEPS: usize = 4;

    let plugin_uuid = credentials.require_plugin_uuid()?;
    let api_key = credentials.require_api_key()?;
    let publisher = Publisher::new(&config.publish, plugin_uuid)?;

    log::step(1, STEPS, "Fetching wanted listing");
    let wanted = fetch(config)?;

    log::step(2, STEPS, "Rendering display");
    log::step(3, STEPS, "Writing artifacts");
    let (rendered, written) = render_and_store(config, credentials, &wanted)?;

    log::step(4, STEPS, "Uploading to webhook");
    publisher.publish_image(rendered.bitmap, &rendered.snapshot, api_key)?;

    let report = RunReport {
        wanted,
        written,
        published_to: Some(publisher.endpoint().to_string()),
    };
    report.log_summary("Push complete");
    Ok(report)
}

/// Fetch and send merge variables to the plugin webhook.
pub fn run_merge(config: &Config, credentials: &Credentials) -> Result<RunReport> {
    const STEPS: usize = 2;

    let plugin_uuid = credentials.require_plugin_uuid()?;
    let publisher = Publisher::new(&config.publish, plugin_uuid)?;

    log::step(1, STEPS, "Fetching wanted listing");
    let wanted = fetch(config)?;

    log::step(2, STEPS, "Sending merge variables");
    let variables = MergeVariables::new(&wanted, qr_code_url(&config.output, credentials, &wanted));
    publisher.publish_merge_variables(&variables)?;

    let report = RunReport {
        wanted,
        written: Vec::new(),
        published_to: Some(publisher.endpoint().to_string()),
    };
    report.log_summary("Merge complete");
    Ok(report)
}

/// Fetch, render and store without publishing anywhere.
pub fn run_snapshot(config: &Config, credentials: &Credentials) -> Result<RunReport> {
    const STEPS: usize = 2;

    log::step(1, STEPS, "Fetching wanted listing");
    let wanted = fetch(config)?;

    log::step(2, STEPS, "Rendering and writing artifacts");
    let (_, written) = render_and_store(config, credentials, &wanted)?;

    let report = RunReport {
        wanted,
        written,
        published_to: None,
    };
    report.log_summary("Snapshot complete");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{DisplayConfig, PresentationRecord};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn wanted(detail_url: Option<&str>) -> Wanted {
        Wanted {
            total: 3,
            fetched_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
            record: PresentationRecord {
                title: "JOHN DOE".to_string(),
                detail_url: detail_url.map(str::to_string),
                ..Default::default()
            },
        }
    }

    fn offline_renderer() -> Renderer {
        Renderer::new(&DisplayConfig::default(), Box::new(ImageChain::default())).unwrap()
    }

    #[test]
    fn test_qr_code_url_variants() {
        let output = OutputConfig::default();
        let with_detail = wanted(Some("https://www.fbi.gov/wanted/a"));

        assert_eq!(qr_code_url(&output, &Credentials::default(), &wanted(None)), None);
        assert_eq!(
            qr_code_url(&output, &Credentials::default(), &with_detail).as_deref(),
            Some("wanted_qr.png")
        );

        let credentials = Credentials {
            repository: Some("someone/wanted-board".to_string()),
            ..Credentials::default()
        };
        assert_eq!(
            qr_code_url(&output, &credentials, &with_detail).as_deref(),
            Some("https://raw.githubusercontent.com/someone/wanted-board/main/data/wanted_qr.png")
        );
    }

    #[test]
    fn test_render_and_write_artifacts() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::with_root(tmp.path(), &OutputConfig::default());
        let renderer = offline_renderer();

        let without_qr = render_wanted(&renderer, &wanted(None), None);
        assert_eq!(without_qr.bitmap.len(), 48_062);
        assert!(without_qr.qr_png.is_none());
        assert_eq!(write_artifacts(&storage, &without_qr).unwrap().len(), 2);
        assert!(!tmp.path().join("wanted_qr.png").exists());

        let with_qr = render_wanted(
            &renderer,
            &wanted(Some("https://www.fbi.gov/wanted/a")),
            Some("wanted_qr.png".to_string()),
        );
        let written = write_artifacts(&storage, &with_qr).unwrap();
        assert_eq!(written.len(), 3);
        assert!(tmp.path().join("wanted_qr.png").exists());
        assert_eq!(
            storage.load_snapshot().unwrap().unwrap().qr_code_url.as_deref(),
            Some("wanted_qr.png")
        );
    }

    #[test]
    fn test_unreadable_previous_snapshot_is_replaced() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("current_wanted.json"), b"{not json").unwrap();
        let storage = LocalStorage::with_root(tmp.path(), &OutputConfig::default());

        let rendered = render_wanted(&offline_renderer(), &wanted(None), None);
        assert_eq!(write_artifacts(&storage, &rendered).unwrap().len(), 2);
        assert_eq!(storage.load_snapshot().unwrap().unwrap().name, "JOHN DOE");
    }

    #[test]
    fn test_push_requires_credentials_first() {
        let config = Config::default();

        let err = run_push(&config, &Credentials::default()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let only_uuid = Credentials {
            plugin_uuid: Some("uuid".to_string()),
            ..Credentials::default()
        };
        let err = run_push(&config, &only_uuid).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("TRMNL_API_KEY")));
    }

    #[test]
    fn test_merge_requires_plugin_uuid() {
        let err = run_merge(&Config::default(), &Credentials::default()).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("TRMNL_PLUGIN_UUID")));
    }
}
