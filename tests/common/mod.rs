//! Loopback stub servers standing in for the listing API, the image proxies
//! and the webhook.

#![allow(dead_code)]

use std::io::Read;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{Value, json};
use tiny_http::{Header, Response, Server};
use wanted_display::models::{Config, Credentials, Selection};

/// A request as the stub saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Canned reply: status, content type, body.
pub type Reply = (u16, &'static str, Vec<u8>);

pub struct Stub {
    pub url: String,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl Stub {
    /// Serve every request with `handler` on a background thread.
    pub fn spawn(handler: impl Fn(&Captured) -> Reply + Send + 'static) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        thread::spawn(move || {
            for mut request in server.incoming_requests() {
                let mut body = Vec::new();
                request.as_reader().read_to_end(&mut body).unwrap();
                let captured = Captured {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    headers: request
                        .headers()
                        .iter()
                        .map(|h| (h.field.to_string(), h.value.to_string()))
                        .collect(),
                    body,
                };

                let (status, content_type, reply) = handler(&captured);
                log.lock().unwrap().push(captured);

                let header = Header::from_bytes("Content-Type", content_type).unwrap();
                let response = Response::from_data(reply)
                    .with_status_code(status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            url: format!("http://127.0.0.1:{port}"),
            requests,
        }
    }

    /// Always answer with `status` and an empty body.
    pub fn status(status: u16) -> Self {
        Self::spawn(move |_| (status, "text/plain", Vec::new()))
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn john_doe() -> Value {
    json!({
        "uid": "abc123",
        "title": "JOHN DOE",
        "description": "05/01/2020\r\nMiami, FL",
        "details": "<p>Should be considered armed and dangerous.</p>",
        "reward_text": "$10,000",
        "race": "white",
        "sex": "Male",
        "subjects": ["Violent Crime - Murders"],
        "height_min": 70,
        "height_max": 72.4,
        "status": "na",
        "url": "https://www.fbi.gov/wanted/topten/john-doe",
        "images": [
            { "original": "https://www.fbi.gov/wanted/topten/john-doe/@@images/image", "caption": null }
        ]
    })
}

/// Listing stub holding `items` and reporting `total`.
pub fn listing(total: u64, items: Vec<Value>) -> Stub {
    Stub::spawn(move |request| {
        let per_page = if request.url.ends_with("per_page=1") { 1 } else { items.len() };
        let page: Vec<Value> = items.iter().take(per_page).cloned().collect();
        let body = json!({ "total": total, "items": page, "page": 1 });
        (200, "application/json", body.to_string().into_bytes())
    })
}

/// Configuration pointing every remote at the given stubs.
pub fn config(api: &Stub, proxy: &Stub, webhook: &Stub, output: &Path) -> Config {
    let mut config = Config::default();
    config.api.base_url = format!("{}/list", api.url);
    config.api.selection = Selection::First;
    config.api.timeout_secs = 5;
    config.images.proxy_hosts = vec![format!("{}/a/", proxy.url), format!("{}/b/", proxy.url)];
    config.images.timeout_secs = 5;
    config.publish.base_url = format!("{}/plugins", webhook.url);
    config.publish.timeout_secs = 5;
    config.output.dir = output.to_path_buf();
    config
}

pub fn credentials(uuid: Option<&str>, api_key: Option<&str>) -> Credentials {
    Credentials {
        plugin_uuid: uuid.map(str::to_string),
        api_key: api_key.map(str::to_string),
        ..Credentials::default()
    }
}
