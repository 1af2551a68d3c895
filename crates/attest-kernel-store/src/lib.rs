//! # Attest Kernel Store
//!
//! Key-value persistence port for the Attest Kernel. Provides a trait-based
//! interface for durable byte storage with SQLite and in-memory adapters.
//!
//! ## Overview
//!
//! The store is the sole source of durability for attested records and
//! idempotency ledgers. The kernel performs no in-memory caching above it,
//! so state cannot diverge from the store across process restarts.
//!
//! ## Key Types
//!
//! - [`KeyValueStore`] - The async port trait
//! - [`SqliteStore`] - SQLite-backed persistent adapter
//! - [`MemoryStore`] - In-memory adapter for tests
//!
//! ## Contract
//!
//! - `put` has overwrite semantics: last write wins, no versioning
//! - `put_if_absent` is atomic single-writer-wins; the admission gate
//!   relies on it for the UNSEEN -> IN_FLIGHT transition
//! - `delete` is idempotent: deleting an absent key is not an error
//! - values are opaque bytes; all structure is the caller's concern

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::KeyValueStore;
