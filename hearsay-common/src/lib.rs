//! Common types and utilities shared across Hearsay crates.
//!
//! This crate defines the shared error taxonomy and the observability helpers
//! used throughout the Hearsay workspace. It is intentionally lightweight and
//! dependency-minimal so that all crates can depend on it without introducing
//! heavy transitive costs.
//!
//! # Overview
//!
//! - [`HearsayError`] and [`Result`]: Shared error handling
//! - [`observability`]: Centralised tracing/logging initialisation

pub mod observability;

/// Error types used across the Hearsay system.
///
/// Every failure reaching the user carries a displayable message; the variant
/// records which stage of a check it came from. Each variant maps to one
/// surfaced notification and one `tracing` event, nothing more.
#[derive(thiserror::Error, Debug)]
pub enum HearsayError {
    /// Input was rejected before any request was dispatched.
    #[error("{0}")]
    Validation(String),

    /// The transport failed, or the server answered outside 2xx without a
    /// usable error body. The message is derived from the status phrase or
    /// the underlying network error.
    #[error("Server error: {0}")]
    Transport(String),

    /// The API reported an `error` field, regardless of HTTP status.
    #[error("{0}")]
    Domain(String),

    /// The response body did not match the expected shape.
    #[error("Invalid response format: {0}")]
    Decode(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`HearsayError`].
pub type Result<T> = std::result::Result<T, HearsayError>;
