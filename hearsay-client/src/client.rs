//! Typed client for the detector API.
//!
//! Each operation validates its input, performs a single JSON POST, and
//! decodes the reply union into a tagged outcome. Failures map onto the
//! shared taxonomy: transport trouble and bare non-2xx statuses become
//! [`HearsayError::Transport`], API-reported `error` fields become
//! [`HearsayError::Domain`] verbatim, and unparseable bodies become
//! [`HearsayError::Decode`].

use std::time::{Duration, Instant};

use hearsay_common::{HearsayError, Result};
use hearsay_http::{HttpClient, HttpError};

use crate::types::{ClaimRequest, Classification, ExplainReport, Reply, UrlRequest};
use crate::validate::{validate_claim, validate_url};

pub struct DetectorClient {
    http: HttpClient,
}

impl DetectorClient {
    /// Build a client against the API base URL (e.g. `http://127.0.0.1:5000/api`).
    pub fn new(base_url: &str) -> Result<Self> {
        let http = HttpClient::new(base_url)
            .map_err(|e| HearsayError::Config(format!("invalid API base URL: {e}")))?;
        Ok(Self { http })
    }

    /// Apply an overall per-request timeout.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.http = self.http.with_timeout(dur);
        self
    }

    /// Classify a free-text claim via `POST /predict`.
    pub async fn check_claim(&self, text: &str) -> Result<Classification> {
        let text = validate_claim(text)?;
        let started = Instant::now();
        tracing::debug!(target: "detector", chars = text.chars().count(), "check_claim.start");

        let reply: Reply<Classification> = self
            .http
            .post_json(
                "predict",
                &ClaimRequest {
                    text: text.to_string(),
                },
            )
            .await
            .map_err(map_http_err)?;

        finish("check_claim", started, reply.into_result())
    }

    /// Fetch and classify an article via `POST /url`.
    pub async fn check_url(&self, url: &str) -> Result<Classification> {
        let url = validate_url(url)?;
        let started = Instant::now();
        tracing::debug!(target: "detector", url = %url, "check_url.start");

        let reply: Reply<Classification> = self
            .http
            .post_json("url", &UrlRequest {
                url: url.to_string(),
            })
            .await
            .map_err(map_http_err)?;

        finish("check_url", started, reply.into_result())
    }

    /// Fetch the per-feature breakdown for a claim via `POST /explain`.
    pub async fn explain(&self, text: &str) -> Result<ExplainReport> {
        let text = validate_claim(text)?;
        let started = Instant::now();
        tracing::debug!(target: "detector", chars = text.chars().count(), "explain.start");

        let reply: Reply<ExplainReport> = self
            .http
            .post_json(
                "explain",
                &ClaimRequest {
                    text: text.to_string(),
                },
            )
            .await
            .map_err(map_http_err)?;

        let outcome = reply.into_result();
        match &outcome {
            Ok(report) => tracing::debug!(
                target: "detector",
                positive = report.top_positive_features.len(),
                negative = report.top_negative_features.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "explain.done"
            ),
            Err(e) => tracing::warn!(target: "detector", error = %e, "explain.failed"),
        }
        outcome
    }

    /// True when `GET /health` answers 2xx. The body is ignored; a transport
    /// failure counts as unhealthy.
    pub async fn health(&self) -> bool {
        match self.http.probe("health").await {
            Ok(status) => status.is_success(),
            Err(e) => {
                tracing::warn!(target: "detector", error = %e, "health.unreachable");
                false
            }
        }
    }
}

fn finish(
    op: &'static str,
    started: Instant,
    outcome: Result<Classification>,
) -> Result<Classification> {
    match &outcome {
        Ok(c) => tracing::debug!(
            target: "detector",
            label = c.label,
            confidence = c.confidence,
            source = %c.decision_source,
            known_site = c.is_known_site,
            matches = c.api_matches.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "{op}.done",
        ),
        Err(e) => tracing::warn!(target: "detector", error = %e, "{op}.failed"),
    }
    outcome
}

fn map_http_err(e: HttpError) -> HearsayError {
    match e {
        HttpError::Api {
            message: Some(message),
            ..
        } => HearsayError::Domain(message),
        HttpError::Api {
            status,
            message: None,
        } => HearsayError::Transport(
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        ),
        HttpError::Decode(err, _snippet) => HearsayError::Decode(err),
        HttpError::Network(m) | HttpError::Url(m) | HttpError::Build(m) => {
            HearsayError::Transport(m)
        }
    }
}
