//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("A response is already in progress")]
    SessionBusy,

    #[error("Illegal session transition: {from} -> {to}")]
    IllegalTransition { from: String, to: String },

    #[error("An approval is already pending for {0}")]
    ApprovalPending(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_display() {
        let error = DomainError::UnknownTool("rm_rf".to_string());
        assert_eq!(error.to_string(), "Unknown tool: rm_rf");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::SessionBusy.is_cancelled());
    }
}
