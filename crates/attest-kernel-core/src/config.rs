//! Configuration validation.
//!
//! Two-phase construct-then-validate: building a [`Value`] is cheap and
//! total; [`validate_config`] is explicit and fallible. On success the
//! canonical digest of the accepted configuration is the externally
//! visible proof of exactly which configuration was loaded.

use crate::canonical::canonical_digest;
use crate::error::ConfigError;
use crate::types::ContentAddress;
use crate::value::Value;

/// Recognized environment names for `global.env`.
pub const ALLOWED_ENVS: &[&str] = &["local", "staging", "production"];

/// A configuration that passed schema checks, plus its content address.
///
/// Immutable after load; the digest is deterministic across repeated
/// validation of the same logical configuration regardless of key
/// insertion order or formatting.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    value: Value,
    digest: ContentAddress,
}

impl ValidatedConfig {
    /// The accepted configuration value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The content address proving what was accepted.
    pub fn digest(&self) -> ContentAddress {
        self.digest
    }

    /// Hex encoding of the digest.
    pub fn digest_hex(&self) -> String {
        self.digest.to_hex()
    }
}

/// Validate a configuration value against the schema.
///
/// Requirements:
/// - `config_version`: text, required
/// - `global`: mapping, required
/// - `global.env`: text, required, one of [`ALLOWED_ENVS`]
///
/// Errors carry the field path and the offending value.
pub fn validate_config(config: &Value) -> Result<ValidatedConfig, ConfigError> {
    let root = config.as_map().ok_or_else(|| ConfigError::InvalidValue {
        path: "$".into(),
        value: describe(config),
        allowed: "mapping".into(),
    })?;

    let version = root
        .get("config_version")
        .ok_or_else(|| ConfigError::MissingField {
            path: "config_version".into(),
        })?;
    if version.as_text().is_none() {
        return Err(ConfigError::InvalidValue {
            path: "config_version".into(),
            value: describe(version),
            allowed: "text".into(),
        });
    }

    let global = root.get("global").ok_or_else(|| ConfigError::MissingField {
        path: "global".into(),
    })?;
    let global_map = global.as_map().ok_or_else(|| ConfigError::InvalidValue {
        path: "global".into(),
        value: describe(global),
        allowed: "mapping".into(),
    })?;

    let env = global_map.get("env").ok_or_else(|| ConfigError::MissingField {
        path: "global.env".into(),
    })?;
    match env.as_text() {
        Some(name) if ALLOWED_ENVS.contains(&name) => {}
        _ => {
            return Err(ConfigError::InvalidValue {
                path: "global.env".into(),
                value: describe(env),
                allowed: ALLOWED_ENVS.join(", "),
            });
        }
    }

    let digest = canonical_digest(config)?;
    Ok(ValidatedConfig {
        value: config.clone(),
        digest,
    })
}

/// Render a value for an error message.
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Text(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("array of {} items", items.len()),
        Value::Map(entries) => format!("mapping with {} keys", entries.len()),
    }
}
