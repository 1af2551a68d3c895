//! Golden test vectors for cross-implementation verification.
//!
//! Every implementation of the canonical codec must produce these exact
//! bytes for these inputs. The digests and signatures are checked for
//! self-consistency (computed, then verified) rather than pinned, since
//! they follow mechanically from the pinned canonical bytes.

use attest_kernel_core::{canonical_bytes, canonical_digest, verify, ContentAddress, Keypair, Value};

/// A single golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    pub name: &'static str,
    pub description: &'static str,
    /// The input document, as JSON text.
    pub json: &'static str,
    /// Expected canonical CBOR encoding, hex.
    pub canonical_hex: &'static str,
}

/// All golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "empty_map",
            description: "empty mapping encodes as a zero-entry CBOR map",
            json: "{}",
            canonical_hex: "a0",
        },
        GoldenVector {
            name: "scalar_map",
            description: "single text key, small integer",
            json: r#"{"a": 1}"#,
            canonical_hex: "a1616101",
        },
        GoldenVector {
            name: "sorted_keys",
            description: "keys emitted in byte order regardless of authoring order",
            json: r#"{"b": 1, "a": 2}"#,
            canonical_hex: "a2616102616201",
        },
        GoldenVector {
            name: "nested_array",
            description: "sequence order is preserved exactly",
            json: r#"{"k": [1, 2, 3]}"#,
            canonical_hex: "a1616b83010203",
        },
        GoldenVector {
            name: "bools_and_null",
            description: "simple values use the fixed one-byte forms",
            json: r#"{"t": true, "f": false, "n": null}"#,
            canonical_hex: "a36166f4616ef66174f5",
        },
        GoldenVector {
            name: "integer_widths",
            description: "integers use the smallest valid encoding",
            json: r#"{"n": -25, "x": 256}"#,
            canonical_hex: "a2616e38186178190100",
        },
        GoldenVector {
            name: "float_fixed_width",
            description: "fractional floats always encode as 64-bit",
            json: r#"{"pi": 1.5}"#,
            canonical_hex: "a1627069fb3ff8000000000000",
        },
        GoldenVector {
            name: "whole_float_normalizes",
            description: "10, 1e1, and 10.0 share one canonical form",
            json: r#"{"n": 1e1}"#,
            canonical_hex: "a1616e0a",
        },
        GoldenVector {
            name: "text_utf8",
            description: "text is definite-length UTF-8",
            json: r#"{"msg": "hi"}"#,
            canonical_hex: "a1636d7367626869",
        },
        GoldenVector {
            name: "non_ascii_text",
            description: "length counts UTF-8 bytes, not code points",
            json: "{\"u\": \"\u{00e9}\"}",
            canonical_hex: "a1617562c3a9",
        },
    ]
}

/// Check one vector: canonical bytes match, digest is consistent, and a
/// deterministic signature over the digest verifies.
pub fn verify_vector(vector: &GoldenVector) -> Result<(), String> {
    let value = Value::from_json_str(vector.json)
        .map_err(|e| format!("{}: parse failed: {}", vector.name, e))?;

    let bytes = canonical_bytes(&value)
        .map_err(|e| format!("{}: encoding failed: {}", vector.name, e))?;
    let actual = hex::encode(&bytes);
    if actual != vector.canonical_hex {
        return Err(format!(
            "{}: canonical bytes mismatch: expected {}, got {}",
            vector.name, vector.canonical_hex, actual
        ));
    }

    let digest = canonical_digest(&value)
        .map_err(|e| format!("{}: digest failed: {}", vector.name, e))?;
    if digest != ContentAddress::digest(&bytes) {
        return Err(format!("{}: digest inconsistent with encoding", vector.name));
    }

    let keypair = Keypair::from_seed(&[0x42; 32]);
    let signature = keypair.sign(digest.as_bytes());
    if !verify(
        digest.as_bytes(),
        signature.as_bytes(),
        keypair.public_key().as_bytes(),
    ) {
        return Err(format!("{}: signature round-trip failed", vector.name));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_verify() {
        for vector in all_vectors() {
            verify_vector(&vector).unwrap();
        }
    }

    #[test]
    fn test_numeric_forms_share_vector_encoding() {
        for json in ["{\"n\": 10}", "{\"n\": 1e1}", "{\"n\": 10.0}"] {
            let value = Value::from_json_str(json).unwrap();
            assert_eq!(
                hex::encode(canonical_bytes(&value).unwrap()),
                "a1616e0a",
                "form {json} diverged"
            );
        }
    }
}
