//! Session state machine
//!
//! Exactly one session is active per conversation. A new user message may
//! only start one when the previous session is terminal. The legal
//! transitions are:
//!
//! ```text
//! Idle → Streaming                     (user submit)
//! Streaming → AwaitingApproval         (tool call resolved to Ask)
//! AwaitingApproval → Streaming         (approval resolved, any outcome)
//! Streaming → Completed                (stream ended, pipeline drained)
//! Streaming | AwaitingApproval → Cancelled   (explicit user cancellation)
//! Streaming | AwaitingApproval → Failed      (transport/provider error)
//! ```

use serde::{Deserialize, Serialize};

/// State of one streaming session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    /// No response in flight
    Idle,
    /// Receiving model output (or running an approved tool call)
    Streaming,
    /// Suspended on a pending approval decision
    AwaitingApproval,
    /// Model finished and all tool calls drained
    Completed,
    /// Explicitly cancelled by the user; partial output retained
    Cancelled,
    /// Transport or provider error; partial output retained
    Failed,
}

impl SessionState {
    /// Cancellation and failure are terminal and symmetric; so is completion.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Cancelled | SessionState::Failed
        )
    }

    /// A new submission is accepted only before the first session or after a
    /// terminal state.
    pub fn accepts_submit(&self) -> bool {
        matches!(self, SessionState::Idle) || self.is_terminal()
    }

    /// Whether `self → to` is a legal transition
    pub fn can_transition(&self, to: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, to),
            (Idle, Streaming)
                | (Streaming, AwaitingApproval)
                | (AwaitingApproval, Streaming)
                | (Streaming, Completed)
                | (Streaming, Cancelled)
                | (AwaitingApproval, Cancelled)
                | (Streaming, Failed)
                | (AwaitingApproval, Failed)
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Streaming => "streaming",
            SessionState::AwaitingApproval => "awaiting-approval",
            SessionState::Completed => "completed",
            SessionState::Cancelled => "cancelled",
            SessionState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(SessionState::Completed.is_terminal());
        assert!(SessionState::Cancelled.is_terminal());
        assert!(SessionState::Failed.is_terminal());
        assert!(!SessionState::Idle.is_terminal());
        assert!(!SessionState::Streaming.is_terminal());
        assert!(!SessionState::AwaitingApproval.is_terminal());
    }

    #[test]
    fn test_submit_gate() {
        assert!(SessionState::Idle.accepts_submit());
        assert!(SessionState::Completed.accepts_submit());
        assert!(SessionState::Cancelled.accepts_submit());
        assert!(SessionState::Failed.accepts_submit());
        assert!(!SessionState::Streaming.accepts_submit());
        assert!(!SessionState::AwaitingApproval.accepts_submit());
    }

    #[test]
    fn test_legal_transitions() {
        use SessionState::*;
        assert!(Idle.can_transition(Streaming));
        assert!(Streaming.can_transition(AwaitingApproval));
        assert!(AwaitingApproval.can_transition(Streaming));
        assert!(Streaming.can_transition(Completed));
        assert!(AwaitingApproval.can_transition(Cancelled));
        assert!(Streaming.can_transition(Failed));
    }

    #[test]
    fn test_illegal_transitions() {
        use SessionState::*;
        // Completion requires the pipeline to have drained; never straight
        // from an open approval.
        assert!(!AwaitingApproval.can_transition(Completed));
        assert!(!Idle.can_transition(AwaitingApproval));
        assert!(!Completed.can_transition(Streaming));
        assert!(!Cancelled.can_transition(Streaming));
        assert!(!Failed.can_transition(Cancelled));
    }
}
