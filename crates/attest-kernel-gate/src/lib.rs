//! # Attest Kernel Gate
//!
//! Write admission for the Attest Kernel: any operation classified as a
//! mutating ("write") action must carry an idempotency key before it is
//! admitted, and resubmissions of the same key replay the stored outcome
//! instead of re-executing the effect.
//!
//! ## Key Types
//!
//! - [`WriteAdmissionGate`] - Per-key UNSEEN -> IN_FLIGHT -> COMPLETED
//!   state machine over a [`KeyValueStore`](attest_kernel_store::KeyValueStore)
//! - [`ToolRegistry`] - Registry of callable tools with write-class entries
//!   required to declare the idempotency-key flag
//! - [`IdempotencyRecord`] - The durable ledger entry for one key
//!
//! ## Collision policy
//!
//! A concurrent duplicate of an in-flight key is rejected with
//! [`GateError::ConcurrentDuplicate`] rather than blocked, since blocking
//! risks unbounded wait on an unrelated failure. Callers back off and
//! retry or poll.

pub mod error;
pub mod gate;
pub mod ledger;
pub mod registry;

pub use error::{GateError, Result};
pub use gate::{AdmitOutcome, EffectError, WriteAdmissionGate};
pub use ledger::{IdempotencyRecord, RecordState};
pub use registry::{ToolClass, ToolRegistry, ToolRegistryEntry};
