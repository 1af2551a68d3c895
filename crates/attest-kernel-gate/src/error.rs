//! Error types for write admission.

use attest_kernel_store::StoreError;
use thiserror::Error;

/// Errors that can occur during admission and registry validation.
#[derive(Debug, Error)]
pub enum GateError {
    /// A write with this idempotency key is already in flight. Transient:
    /// callers should back off and retry or poll, not treat as permanent.
    #[error("concurrent duplicate: write with idempotency key {key:?} is in flight")]
    ConcurrentDuplicate { key: String },

    /// The whole registry is rejected; lists every offending entry.
    #[error(
        "registry rejected: write tools missing requires_idempotency_key: {}",
        .entries.join(", ")
    )]
    RegistryViolations { entries: Vec<String> },

    /// A write-class tool call arrived without an idempotency key.
    #[error("tool {server}/{name} is write-class and requires an idempotency key")]
    MissingIdempotencyKey { server: String, name: String },

    /// The tool is not present in the validated registry.
    #[error("unknown tool: {server}/{name}")]
    UnknownTool { server: String, name: String },

    /// Registry document could not be parsed.
    #[error("malformed registry: {0}")]
    MalformedRegistry(String),

    /// A stored ledger record could not be decoded.
    #[error("corrupt idempotency record for key {key:?}: {reason}")]
    CorruptRecord { key: String, reason: String },

    /// A ledger record could not be encoded for storage.
    #[error("ledger encoding error: {0}")]
    LedgerEncoding(String),

    /// The gated effect itself failed.
    #[error("gated effect failed: {0}")]
    Effect(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for gate operations.
pub type Result<T> = std::result::Result<T, GateError>;
