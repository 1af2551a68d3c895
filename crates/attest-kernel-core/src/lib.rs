//! # Attest Kernel Core
//!
//! Pure primitives for the Attest Kernel: structured values, canonical
//! encoding, content addressing, and Ed25519 attestation.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`Value`] - An immutable structured value (the unit of attestation)
//! - [`ContentAddress`] - Content-derived identifier (Blake3 hash)
//! - [`Keypair`] - Ed25519 signing identity
//! - [`ValidatedConfig`] - A configuration that passed schema checks,
//!   with the digest proving exactly what was accepted
//!
//! ## Canonicalization
//!
//! All values are encoded using deterministic CBOR. See [`canonical`].

pub mod canonical;
pub mod config;
pub mod crypto;
pub mod error;
pub mod types;
pub mod value;

pub use canonical::{canonical_bytes, canonical_digest};
pub use config::{validate_config, ValidatedConfig, ALLOWED_ENVS};
pub use crypto::{verify, Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::{ConfigError, CoreError};
pub use types::ContentAddress;
pub use value::Value;
