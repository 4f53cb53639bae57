//! Decision log port
//!
//! Every permission decision, denial, and cancellation is observable by an
//! external sink. The port stays storage-agnostic; the JSONL adapter lives
//! in the infrastructure layer.

use serde::Serialize;

/// What kind of decision is being recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionKind {
    /// User approved a single call; the permission table is unchanged
    ApprovedOnce,
    /// User approved the tool for the rest of the session
    ApprovedForSession,
    /// User interactively denied a call
    Denied,
    /// Call rejected because the stored permission is `Deny`
    PolicyBlocked,
    /// Session cancelled (discards any pending approval as denied)
    Cancelled,
    /// Administrative permission change (`set`)
    PermissionChanged,
    /// Administrative permission reset to default
    PermissionReset,
}

/// One decision record
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRecord {
    pub kind: DecisionKind,
    /// Tool the decision applies to, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    pub detail: String,
}

impl DecisionRecord {
    pub fn new(kind: DecisionKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            tool: None,
            detail: detail.into(),
        }
    }

    pub fn for_tool(kind: DecisionKind, tool: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            tool: Some(tool.into()),
            detail: detail.into(),
        }
    }
}

/// Port for the decision/notification sink
pub trait DecisionLog: Send + Sync {
    fn record(&self, record: DecisionRecord);
}

/// No-op sink for tests and the one-shot console path
pub struct NullDecisionLog;

impl DecisionLog for NullDecisionLog {
    fn record(&self, _record: DecisionRecord) {}
}
