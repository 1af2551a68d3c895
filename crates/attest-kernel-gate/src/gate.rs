//! The write admission gate.
//!
//! Per idempotency key the ledger moves UNSEEN -> IN_FLIGHT -> COMPLETED.
//! The UNSEEN -> IN_FLIGHT transition rides on the store's atomic
//! `put_if_absent`, so two concurrent first-time submissions of the same
//! key result in exactly one execution of the underlying effect; the loser
//! observes [`GateError::ConcurrentDuplicate`].

use std::future::Future;
use std::sync::Arc;

use attest_kernel_store::KeyValueStore;

use crate::error::{GateError, Result};
use crate::ledger::{ledger_key, IdempotencyRecord, RecordState};
use crate::registry::ToolRegistry;

/// Error type the gated effect may return.
pub type EffectError = Box<dyn std::error::Error + Send + Sync>;

/// How a write request was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmitOutcome {
    /// The effect ran in this call; its outcome marker is returned.
    Executed(Vec<u8>),
    /// A completed record for this key already existed; the stored
    /// outcome is returned without re-executing the effect.
    Replayed(Vec<u8>),
}

impl AdmitOutcome {
    /// The outcome marker, regardless of how it was obtained.
    pub fn marker(&self) -> &[u8] {
        match self {
            AdmitOutcome::Executed(m) | AdmitOutcome::Replayed(m) => m,
        }
    }
}

/// Gates mutating operations behind the idempotency ledger.
pub struct WriteAdmissionGate<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> WriteAdmissionGate<S> {
    /// Create a gate over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Admit a write bearing the given idempotency key.
    ///
    /// - First submission: an `InFlight` record is written atomically, the
    ///   effect runs, and the record transitions to `Completed` holding the
    ///   effect's outcome marker.
    /// - Resubmission after completion: the stored outcome is replayed; the
    ///   effect does not run again.
    /// - Concurrent duplicate: rejected with
    ///   [`GateError::ConcurrentDuplicate`]; callers back off and retry.
    ///
    /// If the effect itself fails, the in-flight record is removed so a
    /// later retry with the same key can proceed. Caller cancellation
    /// mid-flight leaves the record in place.
    pub async fn admit<F, Fut>(&self, key: &str, effect: F) -> Result<AdmitOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<Vec<u8>, EffectError>>,
    {
        let storage_key = ledger_key(key);
        let in_flight = IdempotencyRecord::in_flight(now_millis());

        let won = self
            .store
            .put_if_absent(&storage_key, &in_flight.to_bytes()?)
            .await?;

        if !won {
            return match self.store.get(&storage_key).await? {
                Some(bytes) => {
                    let record = IdempotencyRecord::from_bytes(key, &bytes)?;
                    match record.state {
                        RecordState::Completed => {
                            let outcome =
                                record.outcome.ok_or_else(|| GateError::CorruptRecord {
                                    key: key.to_string(),
                                    reason: "completed record without outcome".into(),
                                })?;
                            tracing::debug!(key, "replaying stored outcome");
                            Ok(AdmitOutcome::Replayed(outcome))
                        }
                        RecordState::InFlight => {
                            tracing::debug!(key, "rejecting concurrent duplicate");
                            Err(GateError::ConcurrentDuplicate {
                                key: key.to_string(),
                            })
                        }
                    }
                }
                // The holder rolled back between our CAS and this read.
                None => Err(GateError::ConcurrentDuplicate {
                    key: key.to_string(),
                }),
            };
        }

        tracing::debug!(key, "admitted first submission");
        match effect().await {
            Ok(outcome) => {
                let completed = in_flight.completed(outcome.clone());
                self.store.put(&storage_key, &completed.to_bytes()?).await?;
                Ok(AdmitOutcome::Executed(outcome))
            }
            Err(e) => {
                // Free the key so a retry can proceed.
                self.store.delete(&storage_key).await?;
                Err(GateError::Effect(e.to_string()))
            }
        }
    }

    /// Admit a tool call against a validated registry.
    ///
    /// Tools that declare `requires_idempotency_key` must carry a key and
    /// go through the ledger; other tools execute directly.
    pub async fn admit_tool<F, Fut>(
        &self,
        registry: &ToolRegistry,
        server: &str,
        name: &str,
        idempotency_key: Option<&str>,
        effect: F,
    ) -> Result<AdmitOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<Vec<u8>, EffectError>>,
    {
        if !registry.requires_key(server, name)? {
            let outcome = effect().await.map_err(|e| GateError::Effect(e.to_string()))?;
            return Ok(AdmitOutcome::Executed(outcome));
        }

        let key = idempotency_key.ok_or_else(|| GateError::MissingIdempotencyKey {
            server: server.to_string(),
            name: name.to_string(),
        })?;
        self.admit(key, effect).await
    }

    /// Read the ledger record for a key, if any.
    pub async fn lookup(&self, key: &str) -> Result<Option<IdempotencyRecord>> {
        match self.store.get(&ledger_key(key)).await? {
            Some(bytes) => Ok(Some(IdempotencyRecord::from_bytes(key, &bytes)?)),
            None => Ok(None),
        }
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ToolClass, ToolRegistryEntry};
    use attest_kernel_store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn gate() -> WriteAdmissionGate<MemoryStore> {
        WriteAdmissionGate::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_first_submission_executes() {
        let gate = gate();
        let outcome = gate
            .admit("k1", || async { Ok(b"done".to_vec()) })
            .await
            .unwrap();
        assert_eq!(outcome, AdmitOutcome::Executed(b"done".to_vec()));
    }

    #[tokio::test]
    async fn test_sequential_resubmission_replays() {
        let gate = gate();
        let executions = AtomicUsize::new(0);

        for expected in [
            AdmitOutcome::Executed(b"once".to_vec()),
            AdmitOutcome::Replayed(b"once".to_vec()),
        ] {
            let outcome = gate
                .admit("k1", || async {
                    executions.fetch_add(1, Ordering::SeqCst);
                    Ok(b"once".to_vec())
                })
                .await
                .unwrap();
            assert_eq!(outcome, expected);
        }

        assert_eq!(executions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_execute_independently() {
        let gate = gate();
        let a = gate.admit("ka", || async { Ok(b"a".to_vec()) }).await.unwrap();
        let b = gate.admit("kb", || async { Ok(b"b".to_vec()) }).await.unwrap();
        assert_eq!(a, AdmitOutcome::Executed(b"a".to_vec()));
        assert_eq!(b, AdmitOutcome::Executed(b"b".to_vec()));
    }

    #[tokio::test]
    async fn test_in_flight_duplicate_rejected() {
        let store = Arc::new(MemoryStore::new());
        let gate = WriteAdmissionGate::new(store.clone());

        // Plant an in-flight record as if another caller held the key.
        let record = IdempotencyRecord::in_flight(0);
        store
            .put(&ledger_key("k1"), &record.to_bytes().unwrap())
            .await
            .unwrap();

        let result = gate.admit("k1", || async { Ok(b"x".to_vec()) }).await;
        assert!(matches!(
            result,
            Err(GateError::ConcurrentDuplicate { ref key }) if key == "k1"
        ));
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_execute_once() {
        let gate = Arc::new(gate());
        let executions = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let gate = gate.clone();
            let executions = executions.clone();
            handles.push(tokio::spawn(async move {
                gate.admit("shared", || async move {
                    executions.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                    Ok(b"winner".to_vec())
                })
                .await
            }));
        }

        let mut executed = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(AdmitOutcome::Executed(m)) => {
                    executed += 1;
                    assert_eq!(m, b"winner".to_vec());
                }
                Ok(AdmitOutcome::Replayed(m)) => assert_eq!(m, b"winner".to_vec()),
                Err(GateError::ConcurrentDuplicate { .. }) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(executed, 1);
        assert_eq!(executions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_effect_frees_key() {
        let gate = gate();

        let result = gate
            .admit("k1", || async { Err::<Vec<u8>, EffectError>("boom".into()) })
            .await;
        assert!(matches!(result, Err(GateError::Effect(_))));

        // Retry with the same key proceeds.
        let outcome = gate
            .admit("k1", || async { Ok(b"retried".to_vec()) })
            .await
            .unwrap();
        assert_eq!(outcome, AdmitOutcome::Executed(b"retried".to_vec()));
    }

    #[tokio::test]
    async fn test_lookup_reflects_lifecycle() {
        let gate = gate();
        assert!(gate.lookup("k1").await.unwrap().is_none());

        gate.admit("k1", || async { Ok(b"m".to_vec()) }).await.unwrap();

        let record = gate.lookup("k1").await.unwrap().unwrap();
        assert_eq!(record.state, RecordState::Completed);
        assert_eq!(record.outcome.as_deref(), Some(b"m".as_slice()));
    }

    fn write_registry() -> ToolRegistry {
        ToolRegistry {
            tools: vec![
                ToolRegistryEntry {
                    tool_server: "fs".into(),
                    tool_name: "read_file".into(),
                    tool_class: ToolClass::Read,
                    requires_idempotency_key: false,
                },
                ToolRegistryEntry {
                    tool_server: "fs".into(),
                    tool_name: "write_file".into(),
                    tool_class: ToolClass::Write,
                    requires_idempotency_key: true,
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_admit_tool_write_without_key_rejected() {
        let gate = gate();
        let registry = write_registry();

        let result = gate
            .admit_tool(&registry, "fs", "write_file", None, || async {
                Ok(b"x".to_vec())
            })
            .await;
        assert!(matches!(
            result,
            Err(GateError::MissingIdempotencyKey { .. })
        ));
    }

    #[tokio::test]
    async fn test_admit_tool_write_with_key_gated() {
        let gate = gate();
        let registry = write_registry();

        let first = gate
            .admit_tool(&registry, "fs", "write_file", Some("op-1"), || async {
                Ok(b"wrote".to_vec())
            })
            .await
            .unwrap();
        assert_eq!(first, AdmitOutcome::Executed(b"wrote".to_vec()));

        let second = gate
            .admit_tool(&registry, "fs", "write_file", Some("op-1"), || async {
                Ok(b"should not run".to_vec())
            })
            .await
            .unwrap();
        assert_eq!(second, AdmitOutcome::Replayed(b"wrote".to_vec()));
    }

    #[tokio::test]
    async fn test_admit_tool_read_bypasses_ledger() {
        let gate = gate();
        let registry = write_registry();

        for _ in 0..2 {
            let outcome = gate
                .admit_tool(&registry, "fs", "read_file", None, || async {
                    Ok(b"contents".to_vec())
                })
                .await
                .unwrap();
            assert_eq!(outcome, AdmitOutcome::Executed(b"contents".to_vec()));
        }
    }

    #[tokio::test]
    async fn test_admit_tool_unknown_tool() {
        let gate = gate();
        let registry = write_registry();

        let result = gate
            .admit_tool(&registry, "fs", "nonexistent", None, || async {
                Ok(Vec::new())
            })
            .await;
        assert!(matches!(result, Err(GateError::UnknownTool { .. })));
    }
}
