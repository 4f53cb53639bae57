//! Per-session tool permission model
//!
//! [`PermissionStore`] is the single mutable table mapping tool name to
//! [`PermissionLevel`]. When no entry exists the effective level is derived
//! from the tool's `requires_approval` flag: `Ask` when true, `Allow` when
//! false.
//!
//! The store is owned by the chat controller and mutated only on its task
//! (administrative commands and approve-session resolutions), so no
//! synchronization is needed; callers re-check it fresh on every invocation
//! and the most recent write always wins.

use crate::tool::entities::ToolCatalog;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do when the model requests a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// Run without prompting
    Allow,
    /// Prompt the user per call
    Ask,
    /// Never run
    Deny,
}

impl PermissionLevel {
    pub fn as_str(&self) -> &str {
        match self {
            PermissionLevel::Allow => "allow",
            PermissionLevel::Ask => "ask",
            PermissionLevel::Deny => "deny",
        }
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PermissionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "allow" => Ok(PermissionLevel::Allow),
            "ask" => Ok(PermissionLevel::Ask),
            "deny" => Ok(PermissionLevel::Deny),
            other => Err(format!("Unknown permission level: {}", other)),
        }
    }
}

/// Mutable per-session permission table with catalog-derived defaults.
#[derive(Debug, Clone, Default)]
pub struct PermissionStore {
    overrides: HashMap<String, PermissionLevel>,
}

impl PermissionStore {
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    /// Seed initial overrides (e.g., from the config file)
    pub fn with_overrides(
        mut self,
        entries: impl IntoIterator<Item = (String, PermissionLevel)>,
    ) -> Self {
        self.overrides.extend(entries);
        self
    }

    /// Effective permission for a tool: stored entry, or the default derived
    /// from `requires_approval` in the catalog. Unknown tools default to
    /// `Deny`; the pipeline rejects them before this matters.
    pub fn check(&self, catalog: &ToolCatalog, tool_name: &str) -> PermissionLevel {
        if let Some(&level) = self.overrides.get(tool_name) {
            return level;
        }
        match catalog.lookup(tool_name) {
            Some(tool) if tool.requires_approval => PermissionLevel::Ask,
            Some(_) => PermissionLevel::Allow,
            None => PermissionLevel::Deny,
        }
    }

    /// Overwrite the stored entry; effective immediately for all subsequent
    /// checks, including calls already queued but not yet permission-checked.
    pub fn set(&mut self, tool_name: impl Into<String>, level: PermissionLevel) {
        self.overrides.insert(tool_name.into(), level);
    }

    /// Remove the override, reverting to the catalog-derived default
    pub fn reset(&mut self, tool_name: &str) {
        self.overrides.remove(tool_name);
    }

    /// Whether an explicit override exists for the tool
    pub fn has_override(&self, tool_name: &str) -> bool {
        self.overrides.contains_key(tool_name)
    }

    /// Effective levels for every tool in the catalog, in catalog order
    pub fn effective(&self, catalog: &ToolCatalog) -> Vec<(String, PermissionLevel)> {
        catalog
            .names()
            .map(|name| (name.to_string(), self.check(catalog, name)))
            .collect()
    }
}
