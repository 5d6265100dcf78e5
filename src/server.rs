// src/server.rs

//! Development HTTP server.
//!
//! Serves one request at a time from a single thread and keeps the selected
//! record in a [`WantedCache`], so repeated polls inside the TTL reuse it.
//!
//! | Route          | Response                                 |
//! |----------------|------------------------------------------|
//! | `GET /`        | service status JSON                      |
//! | `GET /webhook` | merge variables JSON (500 on failure)    |
//! | `GET /display.bmp` | rendered 1-bit bitmap                |

use chrono::{DateTime, Utc};
use serde_json::json;
use tiny_http::{Header, Request, Response, Server};

use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::models::{Credentials, MergeVariables, OutputConfig};
use crate::pipeline::{build_renderer, qr_code_url};
use crate::render::Renderer;
use crate::services::{Clock, Fetcher, ListingApi, SystemClock, WantedCache, WantedSource};

pub const SERVICE_NAME: &str = "FBI Most Wanted Display";
pub const SERVICE_DESCRIPTION: &str = "Displays FBI Most Wanted information on TRMNL e-ink displays";

/// A response independent of the HTTP library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: value.to_string().into_bytes(),
        }
    }

    fn not_found() -> Self {
        Self::json(404, &json!({ "error": "not found" }))
    }
}

/// Request routing and the state shared between requests.
pub struct App<S, C = SystemClock> {
    cache: WantedCache<S, C>,
    renderer: Renderer,
    output: OutputConfig,
    credentials: Credentials,
    /// Bitmap for the record fetched at the given instant
    bitmap: Option<(DateTime<Utc>, Vec<u8>)>,
}

impl App<Fetcher<ListingApi>> {
    /// App backed by the live listing API.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let config = &settings.config;
        let cache = WantedCache::new(
            Fetcher::from_config(&config.api)?,
            std::time::Duration::from_secs(config.cache.ttl_secs),
        );
        Ok(Self::new(
            cache,
            build_renderer(config)?,
            config.output.clone(),
            settings.credentials.clone(),
        ))
    }
}

impl<S: WantedSource, C: Clock> App<S, C> {
    pub fn new(
        cache: WantedCache<S, C>,
        renderer: Renderer,
        output: OutputConfig,
        credentials: Credentials,
    ) -> Self {
        Self {
            cache,
            renderer,
            output,
            credentials,
            bitmap: None,
        }
    }

    /// Route one request.
    pub fn handle(&mut self, method: &str, url: &str) -> Reply {
        if method != "GET" {
            return Reply::not_found();
        }
        let path = url.split('?').next().unwrap_or_default();
        match path {
            "/" => self.status(),
            "/webhook" => self.webhook(),
            "/display.bmp" => self.display(),
            _ => Reply::not_found(),
        }
    }

    fn status(&self) -> Reply {
        Reply::json(
            200,
            &json!({
                "name": SERVICE_NAME,
                "description": SERVICE_DESCRIPTION,
                "version": env!("CARGO_PKG_VERSION"),
                "status": "running",
                "last_update": self.cache.last_update().map(|t| t.to_rfc3339()),
                "refresh_interval": self.cache.ttl().as_secs(),
            }),
        )
    }

    fn webhook(&mut self) -> Reply {
        match self.cache.get() {
            Ok(wanted) => {
                let qr = qr_code_url(&self.output, &self.credentials, &wanted);
                let variables = MergeVariables::new(&wanted, qr);
                match serde_json::to_value(&variables) {
                    Ok(value) => Reply::json(200, &value),
                    Err(e) => Self::failure(&AppError::from(e)),
                }
            }
            Err(e) => Self::failure(&e),
        }
    }

    fn display(&mut self) -> Reply {
        let bitmap = match self.cache.get() {
            Ok(wanted) => match &self.bitmap {
                Some((fetched_at, bitmap)) if *fetched_at == wanted.fetched_at => bitmap.clone(),
                _ => {
                    let bitmap = self.renderer.render(&wanted.record, &wanted.meta());
                    self.bitmap = Some((wanted.fetched_at, bitmap.clone()));
                    bitmap
                }
            },
            Err(e) => {
                log::error!("Display error: {}", e);
                self.renderer.error_canvas(&e.to_string()).to_bmp()
            }
        };

        Reply {
            status: 200,
            content_type: "image/bmp",
            body: bitmap,
        }
    }

    fn failure(error: &AppError) -> Reply {
        log::error!("Webhook error: {}", error);
        Reply::json(500, &json!({ "error": error.to_string() }))
    }
}

/// Bind `host:port` and serve until the process exits.
pub fn serve(settings: &Settings) -> Result<()> {
    let address = format!("{}:{}", settings.config.server.host, settings.config.server.port);
    let server = Server::http(&address).map_err(|e| AppError::network(&address, e))?;
    let mut app = App::from_settings(settings)?;

    log::info!("Server URL: http://{}", address);
    log::info!("Webhook URL: http://{}/webhook", address);

    for request in server.incoming_requests() {
        respond(&mut app, request);
    }
    Ok(())
}

fn respond<S: WantedSource, C: Clock>(app: &mut App<S, C>, request: Request) {
    let method = request.method().to_string();
    let url = request.url().to_string();
    let reply = app.handle(&method, &url);
    log::info!("{} {} -> {}", method, url, reply.status);

    let mut response = Response::from_data(reply.body).with_status_code(reply.status);
    if let Ok(header) = Header::from_bytes("Content-Type", reply.content_type) {
        response = response.with_header(header);
    }
    if let Err(e) = request.respond(response) {
        log::warn!("Failed to send response for {}: {}", url, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DisplayConfig, PresentationRecord, Wanted};
    use crate::services::ImageChain;
    use chrono::TimeZone;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    struct StubSource {
        calls: Rc<Cell<usize>>,
        fail: bool,
    }

    impl WantedSource for StubSource {
        fn fetch_wanted(&self) -> Result<Wanted> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(AppError::network("listing probe", "status 503"));
            }
            Ok(Wanted {
                total: 3,
                fetched_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
                record: PresentationRecord {
                    title: "JOHN DOE".to_string(),
                    ..Default::default()
                },
            })
        }
    }

    fn app(fail: bool) -> (App<StubSource>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let source = StubSource {
            calls: Rc::clone(&calls),
            fail,
        };
        let renderer =
            Renderer::new(&DisplayConfig::default(), Box::new(ImageChain::default())).unwrap();
        let app = App::new(
            WantedCache::new(source, Duration::from_secs(300)),
            renderer,
            OutputConfig::default(),
            Credentials::default(),
        );
        (app, calls)
    }

    fn body_json(reply: &Reply) -> serde_json::Value {
        serde_json::from_slice(&reply.body).unwrap()
    }

    #[test]
    fn test_status_route() {
        let (mut app, calls) = app(false);
        let reply = app.handle("GET", "/");
        let body = body_json(&reply);

        assert_eq!(reply.status, 200);
        assert_eq!(body["status"], "running");
        assert_eq!(body["refresh_interval"], 300);
        assert!(body["last_update"].is_null());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_webhook_route_uses_cache() {
        let (mut app, calls) = app(false);
        let first = app.handle("GET", "/webhook");
        let second = app.handle("GET", "/webhook?refresh=1");

        assert_eq!(first.status, 200);
        assert_eq!(first, second);
        assert_eq!(body_json(&first)["title"], "JOHN DOE");
        assert_eq!(calls.get(), 1);
        assert!(!body_json(&app.handle("GET", "/"))["last_update"].is_null());
    }

    #[test]
    fn test_webhook_failure_is_500_with_error() {
        let (mut app, _) = app(true);
        let reply = app.handle("GET", "/webhook");

        assert_eq!(reply.status, 500);
        assert!(body_json(&reply)["error"].as_str().unwrap().contains("503"));
    }

    #[test]
    fn test_display_route_returns_bitmap() {
        let (mut app, calls) = app(false);
        let reply = app.handle("GET", "/display.bmp");

        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "image/bmp");
        assert_eq!(reply.body.len(), 48_062);
        app.handle("GET", "/display.bmp");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_unknown_routes_are_404() {
        let (mut app, _) = app(false);
        assert_eq!(app.handle("GET", "/nope").status, 404);
        assert_eq!(app.handle("POST", "/webhook").status, 404);
    }
}
