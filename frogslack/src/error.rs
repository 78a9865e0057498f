//! Error types for the request handlers.
//!
//! Each handler stage has its own error type. None of them reach the caller
//! as a status code: the handlers log them and convert them to a fallback
//! reply at the boundary.

use thiserror::Error;

/// Why an inbound request failed signature verification.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("signing secret is not configured")]
    MissingSecret,

    #[error("missing or unreadable header {0}")]
    MissingHeader(&'static str),

    #[error("timestamp is not a unix epoch value: {0:?}")]
    InvalidTimestamp(String),

    /// Timestamp is outside the configured freshness window.
    #[error("timestamp is {age_seconds}s away from now, limit is {max_age_seconds}s")]
    StaleTimestamp { age_seconds: u64, max_age_seconds: u64 },

    #[error("signature does not carry the v0 prefix")]
    MalformedSignature,

    #[error("signature mismatch")]
    Mismatch,
}

/// Any failure while retrieving a tip.
///
/// Transport, decode and empty-result failures all end in the same reply,
/// the variants only exist for logging.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("tips request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("tips response is not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("NOT ENOUGH TIPS")]
    Empty,
}

/// Any failure in the OAuth code exchange.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("install callback has no code")]
    MissingCode,

    #[error("install was denied: {0}")]
    Denied(String),

    #[error("token request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("token response is not JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("token endpoint rejected the code: {0}")]
    Rejected(String),
}
