//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use attest_kernel_core::{Keypair, Value};
use attest_kernel_gate::WriteAdmissionGate;
use attest_kernel_store::MemoryStore;
use std::sync::Arc;

/// A registry document in which every write tool declares the
/// idempotency-key requirement.
pub const COMPLIANT_REGISTRY_JSON: &str = r#"{
    "tools": [
        {"tool_server": "fs", "tool_name": "read_file", "tool_class": "read"},
        {"tool_server": "fs", "tool_name": "write_file", "tool_class": "write",
         "requires_idempotency_key": true},
        {"tool_server": "db", "tool_name": "select", "tool_class": "read"},
        {"tool_server": "db", "tool_name": "upsert", "tool_class": "write",
         "requires_idempotency_key": true}
    ]
}"#;

/// A registry document with a write tool missing the flag.
pub const VIOLATING_REGISTRY_JSON: &str = r#"{
    "tools": [
        {"tool_server": "fs", "tool_name": "read_file", "tool_class": "read"},
        {"tool_server": "db", "tool_name": "upsert", "tool_class": "write",
         "requires_idempotency_key": false}
    ]
}"#;

/// A configuration document that passes schema validation.
pub const VALID_CONFIG_JSON: &str = r#"{"config_version":"1.0","global":{"env":"local"}}"#;

/// A configuration document with an unrecognized environment.
pub const INVALID_ENV_CONFIG_JSON: &str =
    r#"{"config_version":"1.0","global":{"env":"INVALID_ENV"}}"#;

/// A test fixture with a keypair, a memory store, and a gate over it.
pub struct TestFixture {
    pub keypair: Keypair,
    pub store: Arc<MemoryStore>,
    pub gate: WriteAdmissionGate<MemoryStore>,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self::with_seed([0x42; 32])
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            keypair: Keypair::from_seed(&seed),
            gate: WriteAdmissionGate::new(store.clone()),
            store,
        }
    }

    /// Get the keypair's public key.
    pub fn public_key(&self) -> attest_kernel_core::Ed25519PublicKey {
        self.keypair.public_key()
    }

    /// A small audit-event value for attestation tests.
    pub fn sample_event(&self, seq: i64) -> Value {
        Value::from_json_str(&format!(
            r#"{{"event": "tool_call", "tool": "db/upsert", "seq": {seq}}}"#
        ))
        .expect("sample event is valid JSON")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// An [`AuditKernel`](attest_kernel::AuditKernel) over a fresh memory
/// store with a fixed seed, for deterministic end-to-end tests.
pub fn memory_kernel() -> attest_kernel::AuditKernel<MemoryStore> {
    attest_kernel::AuditKernel::new(
        Keypair::from_seed(&[0x42; 32]),
        MemoryStore::new(),
        attest_kernel::KernelConfig::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_kernel_core::validate_config;
    use attest_kernel_gate::ToolRegistry;

    #[test]
    fn test_fixture_documents_behave_as_labeled() {
        let compliant = ToolRegistry::from_json_str(COMPLIANT_REGISTRY_JSON).unwrap();
        assert_eq!(compliant.validate().unwrap(), 4);

        let violating = ToolRegistry::from_json_str(VIOLATING_REGISTRY_JSON).unwrap();
        assert!(violating.validate().is_err());

        let valid = Value::from_json_str(VALID_CONFIG_JSON).unwrap();
        assert!(validate_config(&valid).is_ok());

        let invalid = Value::from_json_str(INVALID_ENV_CONFIG_JSON).unwrap();
        assert!(validate_config(&invalid).is_err());
    }

    #[test]
    fn test_fixture_deterministic_seed() {
        let f1 = TestFixture::with_seed([1; 32]);
        let f2 = TestFixture::with_seed([1; 32]);
        assert_eq!(f1.public_key(), f2.public_key());
    }

    #[tokio::test]
    async fn test_fixture_gate_is_usable() {
        let fixture = TestFixture::new();
        let outcome = fixture
            .gate
            .admit("fixture-key", || async { Ok(b"done".to_vec()) })
            .await
            .unwrap();
        assert_eq!(outcome.marker(), b"done");
    }

    #[tokio::test]
    async fn test_memory_kernel_attests_sample_event() {
        let fixture = TestFixture::new();
        let kernel = memory_kernel();
        let record = kernel.record(&fixture.sample_event(1)).await.unwrap();
        assert!(kernel.verify_record(&record));
    }
}
