//! # Attest Kernel Testkit
//!
//! Testing utilities for the Attest Kernel.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known canonical encodings with expected bytes for
//!   cross-platform verification
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up test scenarios
//!
//! ## Golden Vectors
//!
//! Golden vectors pin the deterministic canonicalization down to the byte:
//!
//! ```rust
//! use attest_kernel_testkit::vectors::{all_vectors, verify_vector};
//!
//! for vector in all_vectors() {
//!     verify_vector(&vector).unwrap();
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use attest_kernel_testkit::generators::structured_value;
//!
//! proptest! {
//!     #[test]
//!     fn digest_is_deterministic(v in structured_value()) {
//!         let d1 = attest_kernel_core::canonical_digest(&v).unwrap();
//!         let d2 = attest_kernel_core::canonical_digest(&v).unwrap();
//!         prop_assert_eq!(d1, d2);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{memory_kernel, TestFixture};
pub use generators::structured_value;
pub use vectors::{all_vectors, verify_vector, GoldenVector};
