//! Minimal HTTP client for talking to the detector API.
//!
//! - Anchors every request to a base URL
//! - JSON in, JSON out (`post_json` / `get_json`), plus a status-only `probe`
//! - Splits failures into network, HTTP-status, and decode errors so callers
//!   can map each onto their own taxonomy
//! - Emits structured `tracing` events for request start, response headers,
//!   body snippets (truncated), and final errors
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), hearsay_http::HttpError> {
//! let client = hearsay_http::HttpClient::new("http://127.0.0.1:5000/api/")?;
//! let got: serde_json::Value = client.get_json("health").await?;
//! # Ok(()) }
//! ```
//!
//! Requests are a single attempt by design: the caller surfaces failures to
//! the user instead of retrying.

use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

static REQ_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    /// Non-2xx status. `message` is populated when the body carried a
    /// parseable error payload, so callers can relay it verbatim.
    #[error("server returned error {status}")]
    Api {
        status: StatusCode,
        message: Option<String>,
    },
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    timeout: Option<Duration>,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// The base should end in `/` so that relative paths join underneath it;
    /// a missing trailing slash is corrected here.
    ///
    /// ```no_run
    /// use hearsay_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new("http://127.0.0.1:5000/api")?;
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = Url::parse(&normalized).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            timeout: None,
        })
    }

    /// Apply an overall per-request timeout. Without one, a stalled request
    /// stays pending until the connection itself dies.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = self.request(Method::POST, path, Some(body)).await?;
        self.decode(&bytes)
    }

    /// GET and decode a JSON response.
    pub async fn get_json<T>(&self, path: &str) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let bytes = self.request::<()>(Method::GET, path, None).await?;
        self.decode(&bytes)
    }

    /// GET, discarding the body. Returns the status; non-2xx is NOT an error
    /// here, so health checks can distinguish "unhealthy" from "unreachable".
    pub async fn probe(&self, path: &str) -> Result<StatusCode, HttpError> {
        let url = self.join(path)?;
        let req_id = next_req_id();
        tracing::debug!(req_id = %req_id, url = %url, "http.probe.start");

        let mut rb = self.inner.get(url);
        if let Some(t) = self.timeout {
            rb = rb.timeout(t);
        }
        let resp = rb
            .send()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;
        let status = resp.status();
        tracing::debug!(req_id = %req_id, %status, "http.probe.done");
        Ok(status)
    }

    fn join(&self, path: &str) -> Result<Url, HttpError> {
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, HttpError> {
        let snippet = snip_body(bytes);
        serde_json::from_slice::<T>(bytes).map_err(|e| {
            tracing::warn!(
                serde_err = %e,
                body_snippet = %snippet,
                "http.response.decode_error"
            );
            HttpError::Decode(e.to_string(), snippet)
        })
    }

    /// Single-attempt request; returns the raw body bytes of a 2xx response.
    async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>, HttpError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.join(path)?;
        let req_id = next_req_id();

        let mut rb = self.inner.request(method.clone(), url.clone());
        if let Some(t) = self.timeout {
            rb = rb.timeout(t);
        }

        if let Some(b) = body {
            let bytes = serde_json::to_vec(b).map_err(|e| HttpError::Build(e.to_string()))?;
            rb = rb
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes);
        }

        tracing::debug!(
            req_id = %req_id,
            method = %method,
            host_path = %format!("{}{}", url.domain().unwrap_or("-"), url.path()),
            has_body = body.is_some(),
            "http.request.start"
        );

        let t0 = std::time::Instant::now();
        let resp = rb.send().await.map_err(|e| {
            let message = e.to_string();
            tracing::warn!(req_id = %req_id, message = %message, "http.network_error.send");
            HttpError::Network(message)
        })?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| {
            let message = e.to_string();
            tracing::warn!(req_id = %req_id, message = %message, "http.network_error.body");
            HttpError::Network(message)
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        tracing::debug!(
            req_id = %req_id,
            %status,
            duration_ms = dur_ms,
            body_len = bytes.len(),
            "http.response"
        );

        let snippet = snip_body(&bytes);
        tracing::trace!(req_id = %req_id, body_snippet = %snippet, "http.response.body_snippet");

        if status.is_success() {
            return Ok(bytes.to_vec());
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(
            req_id = %req_id,
            %status,
            message = %message.as_deref().unwrap_or("-"),
            body_snippet = %snippet,
            "http.error"
        );
        Err(HttpError::Api { status, message })
    }
}

fn next_req_id() -> String {
    format!("r{}", REQ_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Pull a human-readable message out of a failure body, if one is there.
/// The detector API reports `{"error": "..."}`; `{"message": "..."}` is
/// accepted as a fallback shape.
fn extract_error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        error: String,
        #[serde(default)]
        message: String,
    }

    let m = serde_json::from_slice::<Msg>(body).ok()?;
    if !m.error.is_empty() {
        return Some(m.error);
    }
    if !m.message.is_empty() {
        return Some(m.message);
    }
    None
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        snip.truncate(500);
        snip.push_str("...");
    }
    snip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = HttpClient::new("http://127.0.0.1:5000/api").unwrap();
        let url = client.join("predict").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/api/predict");
    }

    #[test]
    fn error_message_prefers_error_field() {
        let body = br#"{"error":"Empty text provided","message":"ignored"}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Empty text provided")
        );
    }

    #[test]
    fn error_message_absent_for_unparseable_body() {
        assert_eq!(extract_error_message(b"<html>teapot</html>"), None);
        assert_eq!(extract_error_message(br#"{"status":"nope"}"#), None);
    }

    #[test]
    fn long_bodies_are_snipped() {
        let body = vec![b'x'; 600];
        let snip = snip_body(&body);
        assert!(snip.ends_with("..."));
        assert_eq!(snip.len(), 503);
    }
}
