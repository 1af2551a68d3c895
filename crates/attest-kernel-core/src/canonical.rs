//! Canonical CBOR encoding for deterministic serialization.
//!
//! This module implements a fixed deterministic profile of RFC 8949:
//! - Map keys are text and sorted lexicographically by UTF-8 bytes
//! - Integers use the smallest valid encoding (major types 0 and 1)
//! - Floats always encode as 64-bit big-endian (major 7, ai 27);
//!   NaN and infinities are rejected, never coerced
//! - Definite lengths only; no tags, no indefinite forms
//!
//! The canonical encoding is critical: it ensures that semantically equal
//! values produce identical bytes (and thus identical content addresses)
//! across all platforms and regardless of how the value was authored.

use crate::error::CoreError;
use crate::types::ContentAddress;
use crate::value::Value;

/// Encode a value to canonical bytes.
///
/// Total over the value grammar except for non-finite floats, which fail
/// with [`CoreError::Encoding`]. Pure function, no side effects.
pub fn canonical_bytes(value: &Value) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value)?;
    Ok(buf)
}

/// Compute the content address of a value's canonical encoding.
///
/// `canonical_digest(v) == ContentAddress::digest(&canonical_bytes(v)?)`.
pub fn canonical_digest(value: &Value) -> Result<ContentAddress, CoreError> {
    Ok(ContentAddress::digest(&canonical_bytes(value)?))
}

/// Recursively encode a value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Null => {
            buf.push(0xf6);
        }
        Value::Bool(b) => {
            buf.push(if *b { 0xf5 } else { 0xf4 });
        }
        Value::Int(i) => {
            encode_integer(buf, *i);
        }
        Value::Float(f) => {
            if !f.is_finite() {
                return Err(CoreError::Encoding(format!(
                    "non-finite float not encodable: {}",
                    f
                )));
            }
            // Fixed-width 64-bit form: one spelling per float value.
            buf.push(0xfb);
            buf.extend_from_slice(&f.to_bits().to_be_bytes());
        }
        Value::Text(s) => {
            encode_text(buf, s);
        }
        Value::Array(items) => {
            encode_uint(buf, 4, items.len() as u64);
            for item in items {
                encode_value_to(buf, item)?;
            }
        }
        Value::Map(entries) => {
            // BTreeMap iterates in byte-wise key order already.
            encode_uint(buf, 5, entries.len() as u64);
            for (key, item) in entries {
                encode_text(buf, key);
                encode_value_to(buf, item)?;
            }
        }
    }
    Ok(())
}

/// Encode a signed integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, n: i64) {
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, !(n as u64));
    }
}

/// Encode an unsigned integer with the given major type, smallest form.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}
