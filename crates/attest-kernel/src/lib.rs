//! # Attest Kernel
//!
//! The unified API for the attest system - content-derived identity,
//! cryptographic attestation, and idempotency-gated write admission.
//!
//! ## Overview
//!
//! The Attest Kernel establishes the trust boundary for a tool-invocation
//! audit layer:
//!
//! - **Records**: Structured values canonically encoded, content-addressed,
//!   and signed, so every audited object has a stable, verifiable identity
//! - **Write admission**: Mutating operations are gated behind idempotency
//!   keys, making retries safe (at-most-once execution of the effect)
//! - **Registry validation**: Every write-class tool must declare the
//!   idempotency-key requirement before any tool is invocable
//! - **Config validation**: Accepted configuration is proven by its digest
//!
//! ## Usage
//!
//! ```rust,no_run
//! use attest_kernel::{AuditKernel, KernelConfig, Keypair, Value};
//! use attest_kernel::store::SqliteStore;
//!
//! async fn example() {
//!     let keypair = Keypair::generate();
//!     let store = SqliteStore::open("kernel.db").unwrap();
//!     let kernel = AuditKernel::new(keypair, store, KernelConfig::default());
//!
//!     let value = Value::from_json_str(r#"{"event": "tool_call"}"#).unwrap();
//!     let record = kernel.record(&value).await.unwrap();
//!     assert!(kernel.verify_record(&record));
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `attest_kernel::core` - Core primitives (Value, ContentAddress, etc.)
//! - `attest_kernel::store` - Key-value persistence port and adapters
//! - `attest_kernel::gate` - Write admission and registry validation

pub mod error;
pub mod kernel;

// Re-export component crates
pub use attest_kernel_core as core;
pub use attest_kernel_gate as gate;
pub use attest_kernel_store as store;

// Re-export main types for convenience
pub use error::{KernelError, Result};
pub use kernel::{AttestedRecord, AuditKernel, KernelConfig};

// Re-export commonly used component types
pub use attest_kernel_core::{
    canonical_bytes, canonical_digest, validate_config, ContentAddress, Ed25519PublicKey,
    Ed25519Signature, Keypair, ValidatedConfig, Value,
};
pub use attest_kernel_gate::{AdmitOutcome, ToolClass, ToolRegistry, WriteAdmissionGate};
pub use attest_kernel_store::{KeyValueStore, MemoryStore, SqliteStore};
