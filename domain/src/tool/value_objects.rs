//! Tool value objects: immutable result and error types
//!
//! Every tool invocation produces a [`ToolResult`], whether the tool ran or
//! not. Rejections (unknown tool, policy block, interactive denial) are
//! results with an error code rather than crate-level errors, so the model
//! sees a uniform shape and can react to all of them the same way.

use serde::{Deserialize, Serialize};

/// Error attached to a failed tool invocation.
///
/// Error codes tell the model and the transcript what kind of failure this
/// was:
///
/// | Code | Meaning |
/// |------|---------|
/// | `NOT_FOUND` | Tool name absent from the catalog, or resource missing |
/// | `INVALID_ARGUMENT` | Call does not match the tool's parameter schema |
/// | `BLOCKED_BY_POLICY` | Permission level resolved to `Deny` |
/// | `DENIED_BY_USER` | The user interactively denied the approval prompt |
/// | `EXECUTION_FAILED` | The tool implementation itself failed |
/// | `TIMEOUT` | The tool implementation timed out |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "BLOCKED_BY_POLICY")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Common error constructors
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            "NOT_FOUND",
            format!("Resource not found: {}", resource.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn blocked_by_policy(tool: impl Into<String>) -> Self {
        Self::new(
            "BLOCKED_BY_POLICY",
            format!("Tool '{}' is blocked by policy", tool.into()),
        )
    }

    pub fn denied_by_user(tool: impl Into<String>) -> Self {
        Self::new(
            "DENIED_BY_USER",
            format!("Tool '{}' was denied by the user", tool.into()),
        )
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            "TIMEOUT",
            format!("Operation timed out: {}", operation.into()),
        )
    }

    /// True for the two deliberate rejection codes (policy block, user deny)
    pub fn is_denial(&self) -> bool {
        self.code == "BLOCKED_BY_POLICY" || self.code == "DENIED_BY_USER"
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool invocation, carrying output or error information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was invoked (or rejected)
    pub tool_name: String,
    /// Whether the invocation was successful
    pub success: bool,
    /// Output content (for successful invocation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error information (for failed invocation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Duration of the invocation in milliseconds, when the tool ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            duration_ms: None,
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            duration_ms: None,
        }
    }

    /// Add duration metadata
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Short single-line preview of the outcome, for UI event payloads
    pub fn preview(&self) -> String {
        match (&self.output, &self.error) {
            (Some(out), _) => {
                let line = out.lines().next().unwrap_or("");
                if line.len() > 80 {
                    // Byte cap; walk back to a char boundary before slicing
                    let mut cut = 77;
                    while !line.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    format!("{}...", &line[..cut])
                } else {
                    line.to_string()
                }
            }
            (None, Some(err)) => err.to_string(),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error() {
        let err = ToolError::not_found("/path/to/file").with_details("File does not exist");

        assert_eq!(err.code, "NOT_FOUND");
        assert!(err.message.contains("/path/to/file"));
        assert!(err.details.is_some());
    }

    #[test]
    fn test_denial_codes() {
        assert!(ToolError::blocked_by_policy("run_command").is_denial());
        assert!(ToolError::denied_by_user("write_file").is_denial());
        assert!(!ToolError::execution_failed("boom").is_denial());
    }

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("read_file", "file contents").with_duration(3);

        assert!(result.is_success());
        assert_eq!(result.output(), Some("file contents"));
        assert!(result.error().is_none());
        assert_eq!(result.duration_ms, Some(3));
    }

    #[test]
    fn test_tool_result_failure() {
        let result = ToolResult::failure("write_file", ToolError::denied_by_user("write_file"));

        assert!(!result.is_success());
        assert!(result.output().is_none());
        assert_eq!(result.error().unwrap().code, "DENIED_BY_USER");
    }

    #[test]
    fn test_preview_truncates_first_line() {
        let long = "x".repeat(200);
        let result = ToolResult::success("read_file", long);
        assert_eq!(result.preview().len(), 80);
        assert!(result.preview().ends_with("..."));
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        // A multibyte character straddling the cut point must not panic
        let mut line = "a".repeat(76);
        line.push('é');
        line.push_str(&"b".repeat(20));
        let result = ToolResult::success("read_file", line);

        let preview = result.preview();
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= 80);

        let all_multibyte = "é".repeat(100);
        let preview = ToolResult::success("read_file", all_multibyte).preview();
        assert!(preview.ends_with("..."));
    }
}
