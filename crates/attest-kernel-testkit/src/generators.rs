//! Proptest generators for property-based testing.

use proptest::prelude::*;

use attest_kernel_core::{ContentAddress, Keypair, Value};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random ContentAddress.
pub fn content_address() -> impl Strategy<Value = ContentAddress> {
    any::<[u8; 32]>().prop_map(ContentAddress::from_bytes)
}

/// Generate a map key.
pub fn map_key() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,15}".prop_map(String::from)
}

/// Generate an idempotency key.
pub fn idempotency_key() -> impl Strategy<Value = String> {
    "[a-z0-9-]{8,36}".prop_map(String::from)
}

/// Generate a finite float (no NaN or infinities).
pub fn finite_float() -> impl Strategy<Value = f64> {
    prop::num::f64::POSITIVE
        | prop::num::f64::NEGATIVE
        | prop::num::f64::NORMAL
        | prop::num::f64::SUBNORMAL
        | prop::num::f64::ZERO
}

/// Generate a scalar value.
pub fn scalar_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        finite_float().prop_map(Value::Float),
        "[ -~]{0,24}".prop_map(Value::Text),
    ]
}

/// Generate a structured value tree of bounded depth and size.
pub fn structured_value() -> impl Strategy<Value = Value> {
    scalar_value().prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(map_key(), inner, 0..6).prop_map(Value::Map),
        ]
    })
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}
