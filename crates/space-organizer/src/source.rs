use reqwest::blocking::Client;
use serde::Deserialize;
use std::cell::Cell;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

use space_tree_core::ContentRecord;

use crate::config::ApiConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Deserialize)]
struct SpaceContentResponse {
    #[serde(default)]
    content: Vec<ContentRecord>,
}

/// Client for the content service's space listing.
pub struct ContentSource {
    client: Client,
    base_url: String,
    delay: Duration,
    last_request: Cell<Option<Instant>>,
}

impl ContentSource {
    pub fn new(api: &ApiConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("space-organizer/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(api.timeout_secs))
                .no_proxy()
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: api.base_url.trim_end_matches('/').to_string(),
            delay: Duration::from_millis(api.request_delay_ms),
            last_request: Cell::new(None),
        }
    }

    pub fn space_content_url(&self, space_id: u32) -> String {
        format!(
            "{}/api/space-content?spaceId={}",
            self.base_url,
            urlencoding::encode(&space_id.to_string())
        )
    }

    fn throttle(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                std::thread::sleep(self.delay - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }

    pub fn fetch_space_content(&self, space_id: u32) -> Result<Vec<ContentRecord>, FetchError> {
        let url = self.space_content_url(space_id);
        self.throttle();

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let body: SpaceContentResponse = response
            .json()
            .map_err(|source| FetchError::Request { url, source })?;

        info!(space_id, records = body.content.len(), "fetched space content");
        Ok(body.content)
    }

    /// Network failures mean "no data from this source", never an aborted run.
    pub fn fetch_or_empty(&self, space_id: u32) -> Vec<ContentRecord> {
        self.fetch_space_content(space_id).unwrap_or_else(|e| {
            warn!(error = %e, "content service unavailable, continuing without it");
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });

        (format!("http://{}", addr), handle)
    }

    fn source_for(base_url: String) -> ContentSource {
        ContentSource::new(&ApiConfig {
            base_url,
            request_delay_ms: 0,
            timeout_secs: 5,
            ..ApiConfig::default()
        })
    }

    #[test]
    fn space_content_url_format() {
        let source = source_for("http://localhost:3000/".to_string());
        assert_eq!(
            source.space_content_url(4),
            "http://localhost:3000/api/space-content?spaceId=4"
        );
    }

    #[test]
    fn fetches_and_parses_content() {
        let (base, handle) = serve_once(
            "200 OK",
            r#"{"content":[{"id":"a","title":"ECMO Video","type":"video","fileUrl":"s3/a.mp4","size":12}]}"#,
        );
        let records = source_for(base).fetch_space_content(4).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "a");
        assert_eq!(records[0].file_url, "s3/a.mp4");
        assert_eq!(records[0].size, Some(12));

        let request = handle.join().unwrap();
        assert!(request.starts_with("GET /api/space-content?spaceId=4 "));
    }

    #[test]
    fn error_status_is_reported() {
        let (base, handle) = serve_once("500 Internal Server Error", "{}");
        let result = source_for(base).fetch_space_content(4);
        handle.join().unwrap();

        assert!(matches!(result, Err(FetchError::Status { status: 500, .. })));
    }

    #[test]
    fn unreachable_service_yields_no_records() {
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let source = source_for(format!("http://127.0.0.1:{}", port));

        assert!(source.fetch_or_empty(4).is_empty());
    }
}
