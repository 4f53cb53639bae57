//! Approval coordination
//!
//! At most one tool invocation per session may be suspended on a user
//! decision. [`ApprovalCoordinator`] owns that single pending slot:
//! [`open`](ApprovalCoordinator::open) refuses a second request while one is
//! pending, and every opened request is guaranteed a resolution path:
//! either an explicit [`ApprovalDecision`] or
//! [`discard_as_denied`](ApprovalCoordinator::discard_as_denied) when the
//! owning session is cancelled or fails.
//!
//! The coordinator runs on the controller task; the UI surfaces a decision
//! by sending a `Resolve` command into the controller inbox, which keeps
//! all mutation on one logical thread.

use weave_domain::{DomainError, ToolCall};

/// The user's resolution of one pending `Ask` tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    /// Run this call; the permission table is unchanged and the next call
    /// to the same tool re-evaluates from scratch
    ApproveOnce,
    /// Run this call and set the tool's permission to `Allow` for the rest
    /// of the session
    ApproveSession,
    /// Do not run this call; the permission table is unchanged
    Deny,
}

impl ApprovalDecision {
    pub fn as_str(&self) -> &str {
        match self {
            ApprovalDecision::ApproveOnce => "approve-once",
            ApprovalDecision::ApproveSession => "approve-session",
            ApprovalDecision::Deny => "deny",
        }
    }
}

impl std::fmt::Display for ApprovalDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One suspended tool invocation awaiting a decision
#[derive(Debug, Clone)]
pub struct PendingApproval {
    pub call: ToolCall,
}

/// State machine holding the single pending approval slot for the active
/// session.
#[derive(Debug, Default)]
pub struct ApprovalCoordinator {
    pending: Option<PendingApproval>,
}

impl ApprovalCoordinator {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Whether a request is currently suspended. The interaction mode
    /// controller consults this to refuse disruptive mode switches.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingApproval> {
        self.pending.as_ref()
    }

    /// Suspend a call pending a decision. Refused while another request is
    /// open; the pipeline's one-in-flight rule means this only fires if a
    /// caller violates that invariant.
    pub fn open(&mut self, call: ToolCall) -> Result<(), DomainError> {
        if let Some(pending) = &self.pending {
            return Err(DomainError::ApprovalPending(
                pending.call.tool_name.clone(),
            ));
        }
        self.pending = Some(PendingApproval { call });
        Ok(())
    }

    /// Supply the decision, consuming the pending slot. Returns the
    /// suspended call paired with the decision, or `None` when nothing was
    /// pending (stale input is ignored, not an error).
    pub fn resolve(&mut self, decision: ApprovalDecision) -> Option<(ToolCall, ApprovalDecision)> {
        self.pending.take().map(|p| (p.call, decision))
    }

    /// Discard the pending request as denied without producing a result.
    /// Used on session cancellation and failure so no request is ever left
    /// unresolvable.
    pub fn discard_as_denied(&mut self) -> Option<ToolCall> {
        self.pending.take().map(|p| p.call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_then_resolve() {
        let mut coordinator = ApprovalCoordinator::new();
        assert!(!coordinator.has_pending());

        coordinator
            .open(ToolCall::new("write_file"))
            .expect("first open succeeds");
        assert!(coordinator.has_pending());
        assert_eq!(
            coordinator.pending().unwrap().call.tool_name,
            "write_file"
        );

        let (call, decision) = coordinator
            .resolve(ApprovalDecision::ApproveOnce)
            .expect("resolution consumes the slot");
        assert_eq!(call.tool_name, "write_file");
        assert_eq!(decision, ApprovalDecision::ApproveOnce);
        assert!(!coordinator.has_pending());
    }

    #[test]
    fn test_second_open_is_rejected_while_pending() {
        let mut coordinator = ApprovalCoordinator::new();
        coordinator.open(ToolCall::new("write_file")).unwrap();

        let err = coordinator.open(ToolCall::new("run_command")).unwrap_err();
        assert!(matches!(err, DomainError::ApprovalPending(name) if name == "write_file"));
        // The original request is untouched
        assert_eq!(coordinator.pending().unwrap().call.tool_name, "write_file");
    }

    #[test]
    fn test_resolve_without_pending_is_ignored() {
        let mut coordinator = ApprovalCoordinator::new();
        assert!(coordinator.resolve(ApprovalDecision::Deny).is_none());
    }

    #[test]
    fn test_discard_as_denied_clears_slot() {
        let mut coordinator = ApprovalCoordinator::new();
        coordinator.open(ToolCall::new("mesh_send")).unwrap();

        let call = coordinator.discard_as_denied().unwrap();
        assert_eq!(call.tool_name, "mesh_send");
        assert!(!coordinator.has_pending());

        // A new request can be opened afterwards
        assert!(coordinator.open(ToolCall::new("mesh_send")).is_ok());
    }
}
