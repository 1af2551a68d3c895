//! The tool registry: which tools exist and how they are classified.
//!
//! Validation enforces the registry-level invariant once, up front: every
//! entry classified `write` must declare `requires_idempotency_key`. A
//! registry failing this check is rejected wholesale, listing every
//! offending entry, before any tool in it is invocable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GateError, Result};

/// Classification of a tool's effect on shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolClass {
    Read,
    Write,
    Admin,
}

impl fmt::Display for ToolClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolClass::Read => write!(f, "read"),
            ToolClass::Write => write!(f, "write"),
            ToolClass::Admin => write!(f, "admin"),
        }
    }
}

/// One callable tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRegistryEntry {
    pub tool_server: String,
    pub tool_name: String,
    pub tool_class: ToolClass,
    #[serde(default)]
    pub requires_idempotency_key: bool,
}

impl ToolRegistryEntry {
    /// `server/name` label used in diagnostics.
    pub fn label(&self) -> String {
        format!("{}/{}", self.tool_server, self.tool_name)
    }
}

/// A registry document: the `tools` sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRegistry {
    pub tools: Vec<ToolRegistryEntry>,
}

impl ToolRegistry {
    /// Parse a registry from its JSON document form.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GateError::MalformedRegistry(e.to_string()))
    }

    /// Validate the registry-level invariant.
    ///
    /// Returns the number of validated tools on success. On failure the
    /// whole registry is rejected with every offending entry named.
    pub fn validate(&self) -> Result<usize> {
        let offenders: Vec<String> = self
            .tools
            .iter()
            .filter(|t| t.tool_class == ToolClass::Write && !t.requires_idempotency_key)
            .map(|t| t.label())
            .collect();

        if !offenders.is_empty() {
            tracing::warn!(
                offenders = offenders.len(),
                "registry rejected: write tools missing idempotency-key requirement"
            );
            return Err(GateError::RegistryViolations { entries: offenders });
        }

        Ok(self.tools.len())
    }

    /// Look up an entry.
    pub fn find(&self, server: &str, name: &str) -> Option<&ToolRegistryEntry> {
        self.tools
            .iter()
            .find(|t| t.tool_server == server && t.tool_name == name)
    }

    /// Whether a tool call must carry an idempotency key.
    pub fn requires_key(&self, server: &str, name: &str) -> Result<bool> {
        let entry = self.find(server, name).ok_or_else(|| GateError::UnknownTool {
            server: server.to_string(),
            name: name.to_string(),
        })?;
        Ok(entry.requires_idempotency_key)
    }
}
