//! Configuration file schema
//!
//! Everything here deserializes from TOML with serde defaults, so a
//! partial config file (or none at all) always yields a usable value.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use weave_domain::PermissionLevel;

/// Top-level configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Mesh daemon connection
    pub daemon: FileDaemonConfig,
    /// Startup permission overrides, tool name to level
    ///
    /// ```toml
    /// [permissions]
    /// run_command = "deny"
    /// glob_search = "allow"
    /// ```
    pub permissions: HashMap<String, PermissionLevel>,
    /// Tool execution options
    pub tools: FileToolsConfig,
    /// Session behavior
    pub session: FileSessionConfig,
    /// Logging sinks
    pub logging: FileLoggingConfig,
}

/// Daemon connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDaemonConfig {
    /// Base URL of the local mesh daemon
    pub url: String,
}

impl Default for FileDaemonConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:7777".to_string(),
        }
    }
}

/// Tool execution settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Default working directory for run_command
    pub working_dir: Option<String>,
    /// Restrict the catalog to read-only tools
    pub read_only: bool,
}

/// Session behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Maximum tool-result continuation turns per session
    pub max_tool_rounds: usize,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self { max_tool_rounds: 8 }
    }
}

/// Logging sink settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Path for the JSONL decision log; disabled when unset
    pub decision_log: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.daemon.url, "http://127.0.0.1:7777");
        assert!(config.permissions.is_empty());
        assert_eq!(config.session.max_tool_rounds, 8);
        assert!(!config.tools.read_only);
        assert!(config.logging.decision_log.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [daemon]
            url = "http://10.0.0.2:7777"

            [permissions]
            run_command = "deny"
            glob_search = "allow"
            "#,
        )
        .unwrap();

        assert_eq!(config.daemon.url, "http://10.0.0.2:7777");
        assert_eq!(
            config.permissions.get("run_command"),
            Some(&PermissionLevel::Deny)
        );
        assert_eq!(
            config.permissions.get("glob_search"),
            Some(&PermissionLevel::Allow)
        );
        // Untouched sections keep their defaults
        assert_eq!(config.session.max_tool_rounds, 8);
    }
}
