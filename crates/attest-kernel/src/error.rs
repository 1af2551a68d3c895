//! Error types for the Kernel.

use attest_kernel_core::{ConfigError, ContentAddress, CoreError};
use attest_kernel_gate::GateError;
use attest_kernel_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Kernel operations.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Encoding or key error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Configuration schema violation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Write admission error.
    #[error("admission error: {0}")]
    Gate(#[from] GateError),

    /// A stored record failed verification on read.
    #[error("attestation failed for record {address}")]
    AttestationFailed { address: ContentAddress },

    /// A stored record could not be decoded.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// A replayed outcome marker did not name a stored record.
    #[error("record not found: {address}")]
    RecordNotFound { address: ContentAddress },
}

/// Result type for Kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
