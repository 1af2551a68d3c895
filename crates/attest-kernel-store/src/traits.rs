//! KeyValueStore trait: the abstract interface for durable byte storage.
//!
//! This trait allows the kernel to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;

use crate::error::Result;

/// The KeyValueStore trait: async interface for opaque byte persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the
/// runtime.
///
/// # Design Notes
///
/// - **Overwrite semantics**: `put` replaces any existing value; there is
///   no implicit versioning.
/// - **Atomic first write**: `put_if_absent` succeeds for exactly one of
///   any set of concurrent callers on the same key. The write admission
///   gate builds its UNSEEN -> IN_FLIGHT transition on this.
/// - **Idempotent delete**: deleting an absent key is not an error.
/// - **No schema**: values are opaque byte strings; callers own all
///   structure within them.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value for a key, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a value under a key, overwriting any existing value.
    async fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Store a value only if the key is currently absent.
    ///
    /// Returns `true` if this call wrote the value, `false` if the key
    /// already existed. The check and write are atomic with respect to
    /// concurrent callers.
    async fn put_if_absent(&self, key: &str, value: &[u8]) -> Result<bool>;

    /// Delete a key. Deleting an absent key succeeds silently.
    async fn delete(&self, key: &str) -> Result<()>;
}
