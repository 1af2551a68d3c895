//! The Kernel: unified API for the attest system.
//!
//! The Kernel brings together canonical encoding, content addressing,
//! signing, storage, and write admission into a cohesive interface.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use attest_kernel_core::{
    canonical_bytes, validate_config, verify, ContentAddress, Ed25519PublicKey, Ed25519Signature,
    Keypair, ValidatedConfig, Value,
};
use attest_kernel_gate::{AdmitOutcome, EffectError, ToolRegistry, WriteAdmissionGate};
use attest_kernel_store::KeyValueStore;

use crate::error::{KernelError, Result};

/// Key namespace prefix for attested records.
const RECORD_PREFIX: &str = "record/";

/// Configuration for the Kernel.
#[derive(Debug, Clone)]
pub struct KernelConfig {
    /// Whether to re-verify records when they are read back.
    pub verify_on_read: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            verify_on_read: true,
        }
    }
}

/// A content-addressed, signed record: the (address, signature, payload)
/// tuple the rest of the system stores and checks.
#[derive(Debug, Clone, PartialEq)]
pub struct AttestedRecord {
    /// Blake3 digest of the canonical payload.
    pub address: ContentAddress,
    /// The public key that produced the signature.
    pub signer: Ed25519PublicKey,
    /// Ed25519 signature over the address bytes.
    pub signature: Ed25519Signature,
    /// The canonical encoding of the recorded value.
    pub payload: Vec<u8>,
}

/// Wire form of an attested record (CBOR via serde).
#[derive(Serialize, Deserialize)]
struct RecordEnvelope {
    address: [u8; 32],
    signer: [u8; 32],
    signature: Vec<u8>,
    payload: Vec<u8>,
}

impl AttestedRecord {
    /// Serialize for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let envelope = RecordEnvelope {
            address: self.address.0,
            signer: self.signer.0,
            signature: self.signature.0.to_vec(),
            payload: self.payload.clone(),
        };
        let mut buf = Vec::new();
        ciborium::into_writer(&envelope, &mut buf)
            .map_err(|e| KernelError::MalformedRecord(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from storage.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let envelope: RecordEnvelope = ciborium::from_reader(bytes)
            .map_err(|e| KernelError::MalformedRecord(e.to_string()))?;
        let signature: [u8; 64] = envelope
            .signature
            .as_slice()
            .try_into()
            .map_err(|_| KernelError::MalformedRecord("signature must be 64 bytes".into()))?;
        Ok(Self {
            address: ContentAddress(envelope.address),
            signer: Ed25519PublicKey(envelope.signer),
            signature: Ed25519Signature(signature),
            payload: envelope.payload,
        })
    }
}

/// The main Kernel struct.
///
/// Provides a unified API for:
/// - Creating attested records from structured values
/// - Gating mutating writes behind idempotency keys
/// - Validating tool registries and configuration documents
pub struct AuditKernel<S: KeyValueStore> {
    /// The signing identity for this kernel instance.
    keypair: Keypair,
    /// The storage backend.
    store: Arc<S>,
    /// Write admission over the same store.
    gate: WriteAdmissionGate<S>,
    /// Configuration.
    config: KernelConfig,
}

impl<S: KeyValueStore + 'static> AuditKernel<S> {
    /// Create a new kernel instance.
    pub fn new(keypair: Keypair, store: S, config: KernelConfig) -> Self {
        let store = Arc::new(store);
        let gate = WriteAdmissionGate::new(store.clone());
        Self {
            keypair,
            store,
            gate,
            config,
        }
    }

    /// Get the kernel's public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the write admission gate.
    pub fn gate(&self) -> &WriteAdmissionGate<S> {
        &self.gate
    }

    /// Build an attested record without persisting it.
    ///
    /// Canonical encode, digest, sign the address. Pure apart from key use.
    pub fn attest(&self, value: &Value) -> Result<AttestedRecord> {
        let payload = canonical_bytes(value)?;
        let address = ContentAddress::digest(&payload);
        let signature = self.keypair.sign(address.as_bytes());
        Ok(AttestedRecord {
            address,
            signer: self.keypair.public_key(),
            signature,
            payload,
        })
    }

    /// Attest a value and persist the record under its content address.
    ///
    /// Content-addressed storage makes this naturally idempotent: the same
    /// value lands at the same key with identical contents.
    pub async fn record(&self, value: &Value) -> Result<AttestedRecord> {
        let record = self.attest(value)?;
        self.store
            .put(&record_key(&record.address), &record.to_bytes()?)
            .await?;
        tracing::debug!(address = %record.address, "recorded attested value");
        Ok(record)
    }

    /// Attest and persist a value through the write admission gate.
    ///
    /// The outcome marker stored in the idempotency ledger is the record's
    /// content address, so a replayed submission returns the record the
    /// first execution produced.
    pub async fn record_write(
        &self,
        idempotency_key: &str,
        value: &Value,
    ) -> Result<AttestedRecord> {
        let record = self.attest(value)?;
        let key = record_key(&record.address);
        let bytes = record.to_bytes()?;
        let address = record.address;

        let store = self.store.clone();
        let outcome = self
            .gate
            .admit(idempotency_key, move || async move {
                store
                    .put(&key, &bytes)
                    .await
                    .map_err(|e| -> EffectError { Box::new(e) })?;
                Ok(address.as_bytes().to_vec())
            })
            .await?;

        match outcome {
            AdmitOutcome::Executed(_) => Ok(record),
            AdmitOutcome::Replayed(marker) => {
                let replayed_address: ContentAddress = marker
                    .as_slice()
                    .try_into()
                    .map_err(|_| KernelError::MalformedRecord("bad outcome marker".into()))?;
                self.fetch(&replayed_address)
                    .await?
                    .ok_or(KernelError::RecordNotFound {
                        address: replayed_address,
                    })
            }
        }
    }

    /// Load a record by content address.
    ///
    /// When `verify_on_read` is set, the record is re-digested and its
    /// signature checked; tampering surfaces as
    /// [`KernelError::AttestationFailed`].
    pub async fn fetch(&self, address: &ContentAddress) -> Result<Option<AttestedRecord>> {
        let Some(bytes) = self.store.get(&record_key(address)).await? else {
            return Ok(None);
        };
        let record = AttestedRecord::from_bytes(&bytes)?;

        if self.config.verify_on_read && !self.verify_record(&record) {
            return Err(KernelError::AttestationFailed { address: *address });
        }

        Ok(Some(record))
    }

    /// Verify a record: address matches the payload digest and the
    /// signature verifies against the signer. Boolean, never raises.
    pub fn verify_record(&self, record: &AttestedRecord) -> bool {
        if ContentAddress::digest(&record.payload) != record.address {
            return false;
        }
        verify(
            record.address.as_bytes(),
            record.signature.as_bytes(),
            record.signer.as_bytes(),
        )
    }

    /// Parse and validate a configuration document.
    pub fn load_config(&self, json: &str) -> Result<ValidatedConfig> {
        let value = Value::from_json_str(json)?;
        Ok(validate_config(&value)?)
    }

    /// Parse and validate a tool registry document.
    ///
    /// A registry with any write-class tool missing the idempotency-key
    /// requirement is rejected wholesale.
    pub fn load_registry(&self, json: &str) -> Result<ToolRegistry> {
        let registry = ToolRegistry::from_json_str(json)?;
        let count = registry.validate()?;
        tracing::debug!(tools = count, "registry validated");
        Ok(registry)
    }
}

/// Build the storage key for a record address.
fn record_key(address: &ContentAddress) -> String {
    format!("{}{}", RECORD_PREFIX, address.to_hex())
}
