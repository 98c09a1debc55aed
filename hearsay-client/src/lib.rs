//! Typed client for the fake-news detector API.
//!
//! The API classifies a free-text claim or a fetched article URL and answers
//! with a verdict, a confidence split, and optional corroborating sources.
//! This crate owns the wire model, the client-side input validators, and the
//! dispatch itself; presentation lives elsewhere.

mod client;
pub mod types;
pub mod validate;

pub use client::DetectorClient;
pub use types::{
    ApiMatch, ClaimRequest, Classification, ExplainReport, FeatureWeight, Probabilities,
    UrlRequest, VerdictType,
};
pub use validate::{MAX_CLAIM_CHARS, ValidationError, validate_claim, validate_url};
