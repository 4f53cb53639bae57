//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category of a tool, a small closed set used for browsing and grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolCategory {
    /// File access (read_file, write_file, list_dir)
    Filesystem,
    /// Repository exploration (glob_search, grep_search)
    CodeExploration,
    /// Shell-like actions (run_command)
    System,
    /// Network and web access (web_fetch)
    Web,
    /// Calls routed to mesh peers via the daemon (mesh_send, mesh_query)
    MeshRpc,
}

impl ToolCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ToolCategory::Filesystem => "filesystem",
            ToolCategory::CodeExploration => "code-exploration",
            ToolCategory::System => "system",
            ToolCategory::Web => "web",
            ToolCategory::MeshRpc => "mesh-rpc",
        }
    }

    /// All categories in display order
    pub fn all() -> [ToolCategory; 5] {
        [
            ToolCategory::Filesystem,
            ToolCategory::CodeExploration,
            ToolCategory::System,
            ToolCategory::Web,
            ToolCategory::MeshRpc,
        ]
    }
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition of a tool the model may request to invoke
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique, stable name (e.g., "read_file")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Category this tool belongs to
    pub category: ToolCategory,
    /// Whether invocation must be confirmed by the user unless overridden
    pub requires_approval: bool,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint (e.g., "string", "path", "number")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: ToolCategory,
        requires_approval: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category,
            requires_approval,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Immutable collection of the tools available to the process.
///
/// Built once at startup; lookups never mutate. Iteration order is the
/// registration order, so listings are stable across renders.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool (builder pattern). A tool registered twice replaces
    /// the earlier definition in place, keeping its position.
    pub fn register(mut self, tool: ToolDefinition) -> Self {
        if let Some(&pos) = self.index.get(&tool.name) {
            self.tools[pos] = tool;
        } else {
            self.index.insert(tool.name.clone(), self.tools.len());
            self.tools.push(tool);
        }
        self
    }

    /// Look up a tool by exact name
    pub fn lookup(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&pos| &self.tools[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All tools in registration order
    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    /// Tools in the given category, in registration order
    pub fn by_category(&self, category: ToolCategory) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter().filter(move |t| t.category == category)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A call to a tool with arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string argument or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Get an optional i64 argument
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(|v| v.as_i64())
    }

    /// Get an optional bool argument
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| v.as_bool())
    }

    /// Compact single-line rendering of the arguments for prompts and logs
    pub fn args_preview(&self) -> String {
        let mut keys: Vec<&str> = self.arguments.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        let parts: Vec<String> = keys
            .iter()
            .map(|k| format!("{}={}", k, self.arguments[*k]))
            .collect();
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> ToolCatalog {
        ToolCatalog::new()
            .register(ToolDefinition::new(
                "read_file",
                "Read file",
                ToolCategory::Filesystem,
                false,
            ))
            .register(ToolDefinition::new(
                "write_file",
                "Write file",
                ToolCategory::Filesystem,
                true,
            ))
            .register(ToolDefinition::new(
                "mesh_send",
                "Send to peer",
                ToolCategory::MeshRpc,
                true,
            ))
    }

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new(
            "read_file",
            "Read file contents",
            ToolCategory::Filesystem,
            false,
        )
        .with_parameter(ToolParameter::new("path", "File path to read", true).with_type("path"));

        assert_eq!(tool.name, "read_file");
        assert!(!tool.requires_approval);
        assert_eq!(tool.parameters.len(), 1);
        assert_eq!(tool.parameters[0].name, "path");
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = sample_catalog();
        assert!(catalog.lookup("read_file").is_some());
        assert!(catalog.lookup("write_file").is_some());
        assert!(catalog.lookup("unknown").is_none());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_catalog_preserves_registration_order() {
        let catalog = sample_catalog();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["read_file", "write_file", "mesh_send"]);
    }

    #[test]
    fn test_catalog_by_category() {
        let catalog = sample_catalog();
        let fs: Vec<&str> = catalog
            .by_category(ToolCategory::Filesystem)
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(fs, vec!["read_file", "write_file"]);

        let mesh: Vec<&str> = catalog
            .by_category(ToolCategory::MeshRpc)
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(mesh, vec!["mesh_send"]);
    }

    #[test]
    fn test_catalog_reregister_replaces_in_place() {
        let catalog = sample_catalog().register(ToolDefinition::new(
            "write_file",
            "Write file v2",
            ToolCategory::Filesystem,
            true,
        ));
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.lookup("write_file").unwrap().description, "Write file v2");
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["read_file", "write_file", "mesh_send"]);
    }

    #[test]
    fn test_tool_call() {
        let call = ToolCall::new("read_file").with_arg("path", "/test/file.txt");

        assert_eq!(call.tool_name, "read_file");
        assert_eq!(call.get_string("path"), Some("/test/file.txt"));
        assert_eq!(call.require_string("path").unwrap(), "/test/file.txt");
        assert!(call.require_string("missing").is_err());
    }

    #[test]
    fn test_args_preview_is_sorted_and_compact() {
        let call = ToolCall::new("run_command")
            .with_arg("timeout", 30)
            .with_arg("command", "ls");
        assert_eq!(call.args_preview(), "command=\"ls\", timeout=30");
    }
}
