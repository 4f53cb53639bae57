//! Surface switching with the approval-pending guard
//!
//! One surface is active at a time. While a tool approval is pending the
//! controller refuses every switch request, so the approval prompt cannot
//! be hidden behind another surface; the decision keys remain live
//! regardless (they are routed before surface keys, see
//! [`keys`](super::keys)).

use weave_domain::InteractionMode;

/// Outcome of a surface switch request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The active surface changed (or already was the target)
    Switched(InteractionMode),
    /// Refused; the reason is shown to the user as a notice
    Refused(String),
}

/// Tracks the active surface and arbitrates switch requests
#[derive(Debug, Default)]
pub struct SurfaceController {
    active: InteractionMode,
    approval_pending: bool,
}

impl SurfaceController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> InteractionMode {
        self.active
    }

    pub fn approval_pending(&self) -> bool {
        self.approval_pending
    }

    /// Called by the event loop when an approval opens or resolves
    pub fn set_approval_pending(&mut self, pending: bool) {
        self.approval_pending = pending;
    }

    /// Request a switch to another surface
    pub fn request_switch(&mut self, target: InteractionMode) -> SwitchOutcome {
        if self.approval_pending && target != self.active {
            return SwitchOutcome::Refused(
                "a tool approval is pending; approve (y/a) or deny (n) first".to_string(),
            );
        }
        self.active = target;
        SwitchOutcome::Switched(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_surface_is_conversation() {
        let surfaces = SurfaceController::new();
        assert_eq!(surfaces.active(), InteractionMode::Conversation);
    }

    #[test]
    fn test_switch_when_idle() {
        let mut surfaces = SurfaceController::new();
        assert_eq!(
            surfaces.request_switch(InteractionMode::ToolBrowse),
            SwitchOutcome::Switched(InteractionMode::ToolBrowse)
        );
        assert_eq!(surfaces.active(), InteractionMode::ToolBrowse);
    }

    #[test]
    fn test_switch_refused_while_approval_pending() {
        let mut surfaces = SurfaceController::new();
        surfaces.set_approval_pending(true);

        let outcome = surfaces.request_switch(InteractionMode::Pairing);
        assert!(matches!(outcome, SwitchOutcome::Refused(_)));
        // The active surface is unchanged
        assert_eq!(surfaces.active(), InteractionMode::Conversation);
    }

    #[test]
    fn test_switch_allowed_after_resolution() {
        let mut surfaces = SurfaceController::new();
        surfaces.set_approval_pending(true);
        assert!(matches!(
            surfaces.request_switch(InteractionMode::Edit),
            SwitchOutcome::Refused(_)
        ));

        surfaces.set_approval_pending(false);
        assert_eq!(
            surfaces.request_switch(InteractionMode::Edit),
            SwitchOutcome::Switched(InteractionMode::Edit)
        );
    }

    #[test]
    fn test_switch_to_current_surface_is_allowed_while_pending() {
        let mut surfaces = SurfaceController::new();
        surfaces.set_approval_pending(true);
        assert_eq!(
            surfaces.request_switch(InteractionMode::Conversation),
            SwitchOutcome::Switched(InteractionMode::Conversation)
        );
    }
}
