//! Tool runner port
//!
//! Defines how the execution pipeline invokes tool implementations. The
//! runner owns the immutable [`ToolCatalog`]; the pipeline looks tools up
//! here, permission-checks against the same catalog, and calls [`run`]
//! exactly once per invocation (no implicit retries).
//!
//! [`run`]: ToolRunnerPort::run

use async_trait::async_trait;
use weave_domain::{ToolCall, ToolCatalog, ToolDefinition, ToolResult};

/// Port for tool invocation
#[async_trait]
pub trait ToolRunnerPort: Send + Sync {
    /// The catalog of tools this runner can invoke
    fn catalog(&self) -> &ToolCatalog;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.catalog().contains(name)
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.catalog().lookup(name)
    }

    /// Invoke a tool call. Failures are data: the runner returns a failed
    /// [`ToolResult`] rather than panicking or erroring at the crate level.
    async fn run(&self, call: &ToolCall) -> ToolResult;
}
