//! The structured value grammar.
//!
//! A [`Value`] is an immutable tree of scalars, sequences, and text-keyed
//! mappings. Mappings use [`BTreeMap`], so key insertion order carries no
//! semantic weight by construction; two values built in different orders
//! compare equal and encode identically.

use std::collections::BTreeMap;

use crate::error::CoreError;

/// Largest f64 magnitude at which every whole value is exactly
/// representable (2^53).
const MAX_EXACT_INT_F64: f64 = 9_007_199_254_740_992.0;

/// A structured value: the unit of canonical encoding and attestation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Convert a JSON document into the value grammar.
    ///
    /// Fails with [`CoreError::Encoding`] for integers outside the i64
    /// range. JSON cannot carry non-finite floats, but the canonical
    /// encoder re-checks finiteness regardless of how a value was built.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, CoreError> {
        match json {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if n.is_u64() {
                    Err(CoreError::Encoding(format!(
                        "integer out of i64 range: {}",
                        n
                    )))
                } else {
                    // serde_json only produces finite floats
                    let f = n.as_f64().ok_or_else(|| {
                        CoreError::Encoding(format!("unrepresentable number: {}", n))
                    })?;
                    // Whole-valued floats normalize to integers so that the
                    // textual forms 10, 1e1, and 10.0 share one encoding.
                    if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INT_F64 {
                        Ok(Value::Int(f as i64))
                    } else {
                        Ok(Value::Float(f))
                    }
                }
            }
            serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
            serde_json::Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(Value::from_json(item)?);
                }
                Ok(Value::Array(out))
            }
            serde_json::Value::Object(fields) => {
                let mut out = BTreeMap::new();
                for (key, item) in fields {
                    out.insert(key.clone(), Value::from_json(item)?);
                }
                Ok(Value::Map(out))
            }
        }
    }

    /// Parse a JSON string into the value grammar.
    pub fn from_json_str(s: &str) -> Result<Self, CoreError> {
        let json: serde_json::Value =
            serde_json::from_str(s).map_err(|e| CoreError::Encoding(e.to_string()))?;
        Self::from_json(&json)
    }

    /// The text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The mapping content, if this is a map value.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// The boolean content, if this is a bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Look up a key in a map value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}
