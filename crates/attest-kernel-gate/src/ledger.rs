//! The durable idempotency ledger.
//!
//! One [`IdempotencyRecord`] per idempotency key, stored as CBOR in the
//! key-value store under the `idem/` namespace. Records are created on
//! first admission, read (never mutated in place) on every resubmission,
//! and never deleted by the core; retention is an external concern.

use serde::{Deserialize, Serialize};

use crate::error::{GateError, Result};

/// Key namespace prefix for ledger entries.
pub(crate) const LEDGER_PREFIX: &str = "idem/";

/// The lifecycle state of one idempotency key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordState {
    /// The underlying write is executing.
    InFlight,
    /// The write completed; the outcome marker is stored.
    Completed,
}

/// The ledger entry for one idempotency key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdempotencyRecord {
    pub state: RecordState,
    /// Opaque outcome marker, present once completed.
    pub outcome: Option<Vec<u8>>,
    /// Creation time, Unix milliseconds.
    pub created_at: i64,
}

impl IdempotencyRecord {
    /// A fresh in-flight record.
    pub fn in_flight(created_at: i64) -> Self {
        Self {
            state: RecordState::InFlight,
            outcome: None,
            created_at,
        }
    }

    /// Transition to completed with the write's outcome marker.
    pub fn completed(self, outcome: Vec<u8>) -> Self {
        Self {
            state: RecordState::Completed,
            outcome: Some(outcome),
            created_at: self.created_at,
        }
    }

    /// Serialize to CBOR for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| GateError::LedgerEncoding(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from stored CBOR.
    pub fn from_bytes(key: &str, bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e| GateError::CorruptRecord {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Build the storage key for an idempotency key.
pub(crate) fn ledger_key(key: &str) -> String {
    format!("{}{}", LEDGER_PREFIX, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_roundtrip() {
        let record = IdempotencyRecord::in_flight(1736870400000);
        let bytes = record.to_bytes().unwrap();
        let decoded = IdempotencyRecord::from_bytes("k", &bytes).unwrap();
        assert_eq!(record, decoded);
    }

    #[test]
    fn test_completion_keeps_created_at() {
        let record = IdempotencyRecord::in_flight(42);
        let done = record.completed(b"outcome".to_vec());
        assert_eq!(done.state, RecordState::Completed);
        assert_eq!(done.outcome.as_deref(), Some(b"outcome".as_slice()));
        assert_eq!(done.created_at, 42);
    }

    #[test]
    fn test_corrupt_bytes_rejected() {
        let result = IdempotencyRecord::from_bytes("k", b"\xff\xff\xff");
        assert!(matches!(result, Err(GateError::CorruptRecord { .. })));
    }

    #[test]
    fn test_ledger_key_namespaced() {
        assert_eq!(ledger_key("abc"), "idem/abc");
    }
}
