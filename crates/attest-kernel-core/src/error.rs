//! Error types for the Attest Kernel Core.

use thiserror::Error;

/// Core errors for encoding and key handling.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Value outside the canonical grammar (non-finite float,
    /// out-of-range integer). Never recoverable by retry.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Malformed signing key material.
    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}

/// Configuration schema violations.
///
/// Always carries the field path and the offending value so the caller
/// can report exactly what was rejected. Nothing is silently defaulted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field: {path}")]
    MissingField { path: String },

    #[error("invalid value for {path}: {value} (allowed: {allowed})")]
    InvalidValue {
        path: String,
        value: String,
        allowed: String,
    },

    #[error("configuration not canonically encodable: {0}")]
    Encoding(#[from] CoreError),
}
