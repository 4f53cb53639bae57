//! Key routing
//!
//! Maps key events to [`UiAction`]s. Routing happens in two layers: when
//! the approval modal is open its decision keys win, then the active
//! surface's bindings apply. Ctrl-C cancels the session from anywhere.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use weave_domain::InteractionMode;

/// User action derived from key events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Insert a character into the active input
    InsertChar(char),
    /// Delete the character before the cursor
    DeleteChar,
    /// Submit the active input (message, code, form, composition)
    Submit,
    /// Insert a newline (Edit surface)
    Newline,
    /// Scroll the conversation
    ScrollUp,
    ScrollDown,
    /// Move the selection (tool browser, form fields)
    SelectPrev,
    SelectNext,
    /// Switch to another surface
    SwitchSurface(InteractionMode),
    /// Approval decisions
    ApproveOnce,
    ApproveSession,
    Deny,
    /// Cancel the active session
    CancelSession,
    /// Quit the application
    Quit,
    /// No action
    None,
}

/// Key event router
pub struct KeyRouter;

impl KeyRouter {
    /// Route a key event given the active surface and modal state
    pub fn route(surface: InteractionMode, approval_open: bool, key: KeyEvent) -> UiAction {
        // Ctrl-C always cancels the session, modal or not
        if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
            return UiAction::CancelSession;
        }

        if approval_open {
            return Self::route_approval(key);
        }

        // Function keys switch surfaces from anywhere
        match key.code {
            KeyCode::F(1) => return UiAction::SwitchSurface(InteractionMode::Conversation),
            KeyCode::F(2) => return UiAction::SwitchSurface(InteractionMode::ToolBrowse),
            KeyCode::F(3) => return UiAction::SwitchSurface(InteractionMode::Pairing),
            KeyCode::F(4) => return UiAction::SwitchSurface(InteractionMode::Edit),
            KeyCode::F(5) => return UiAction::SwitchSurface(InteractionMode::Form),
            _ => {}
        }

        match surface {
            InteractionMode::Conversation => Self::route_conversation(key),
            InteractionMode::ToolBrowse => Self::route_tool_browse(key),
            InteractionMode::Pairing => Self::route_line_input(key),
            InteractionMode::Edit => Self::route_edit(key),
            InteractionMode::Form => Self::route_form(key),
        }
    }

    /// Approval modal: y approve once, a approve for session, n or Esc deny
    fn route_approval(key: KeyEvent) -> UiAction {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => UiAction::ApproveOnce,
            KeyCode::Char('a') | KeyCode::Char('A') => UiAction::ApproveSession,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => UiAction::Deny,
            _ => UiAction::None,
        }
    }

    fn route_conversation(key: KeyEvent) -> UiAction {
        match (key.code, key.modifiers) {
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => UiAction::Quit,
            (KeyCode::Enter, _) => UiAction::Submit,
            (KeyCode::Backspace, _) => UiAction::DeleteChar,
            (KeyCode::Up, _) => UiAction::ScrollUp,
            (KeyCode::Down, _) => UiAction::ScrollDown,
            (KeyCode::Char(c), _) => UiAction::InsertChar(c),
            _ => UiAction::None,
        }
    }

    fn route_tool_browse(key: KeyEvent) -> UiAction {
        match key.code {
            KeyCode::Esc => UiAction::SwitchSurface(InteractionMode::Conversation),
            KeyCode::Up | KeyCode::Char('k') => UiAction::SelectPrev,
            KeyCode::Down | KeyCode::Char('j') => UiAction::SelectNext,
            // Enter opens the manual invocation form for the selected tool
            KeyCode::Enter => UiAction::SwitchSurface(InteractionMode::Form),
            _ => UiAction::None,
        }
    }

    /// Single-line input surfaces (pairing code)
    fn route_line_input(key: KeyEvent) -> UiAction {
        match key.code {
            KeyCode::Esc => UiAction::SwitchSurface(InteractionMode::Conversation),
            KeyCode::Enter => UiAction::Submit,
            KeyCode::Backspace => UiAction::DeleteChar,
            KeyCode::Char(c) => UiAction::InsertChar(c),
            _ => UiAction::None,
        }
    }

    /// Multi-line composition: Enter inserts a newline, Ctrl-S submits
    fn route_edit(key: KeyEvent) -> UiAction {
        match (key.code, key.modifiers) {
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => UiAction::Submit,
            (KeyCode::Esc, _) => UiAction::SwitchSurface(InteractionMode::Conversation),
            (KeyCode::Enter, _) => UiAction::Newline,
            (KeyCode::Backspace, _) => UiAction::DeleteChar,
            (KeyCode::Char(c), _) => UiAction::InsertChar(c),
            _ => UiAction::None,
        }
    }

    /// Form surface: Tab cycles fields, Enter submits the call
    fn route_form(key: KeyEvent) -> UiAction {
        match key.code {
            KeyCode::Esc => UiAction::SwitchSurface(InteractionMode::ToolBrowse),
            KeyCode::Tab | KeyCode::Down => UiAction::SelectNext,
            KeyCode::BackTab | KeyCode::Up => UiAction::SelectPrev,
            KeyCode::Enter => UiAction::Submit,
            KeyCode::Backspace => UiAction::DeleteChar,
            KeyCode::Char(c) => UiAction::InsertChar(c),
            _ => UiAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_approval_keys_take_precedence() {
        let action = KeyRouter::route(InteractionMode::Conversation, true, key(KeyCode::Char('y')));
        assert_eq!(action, UiAction::ApproveOnce);

        let action = KeyRouter::route(InteractionMode::Conversation, true, key(KeyCode::Char('a')));
        assert_eq!(action, UiAction::ApproveSession);

        let action = KeyRouter::route(InteractionMode::Conversation, true, key(KeyCode::Char('n')));
        assert_eq!(action, UiAction::Deny);

        let action = KeyRouter::route(InteractionMode::Conversation, true, key(KeyCode::Esc));
        assert_eq!(action, UiAction::Deny);

        // Typing keys are swallowed while the modal is open
        let action = KeyRouter::route(InteractionMode::Conversation, true, key(KeyCode::Char('x')));
        assert_eq!(action, UiAction::None);
    }

    #[test]
    fn test_ctrl_c_cancels_even_with_modal_open() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            KeyRouter::route(InteractionMode::Conversation, true, ctrl_c),
            UiAction::CancelSession
        );
        assert_eq!(
            KeyRouter::route(InteractionMode::ToolBrowse, false, ctrl_c),
            UiAction::CancelSession
        );
    }

    #[test]
    fn test_conversation_typing_and_submit() {
        assert_eq!(
            KeyRouter::route(InteractionMode::Conversation, false, key(KeyCode::Char('h'))),
            UiAction::InsertChar('h')
        );
        assert_eq!(
            KeyRouter::route(InteractionMode::Conversation, false, key(KeyCode::Enter)),
            UiAction::Submit
        );
        assert_eq!(
            KeyRouter::route(InteractionMode::Conversation, false, key(KeyCode::Backspace)),
            UiAction::DeleteChar
        );
    }

    #[test]
    fn test_function_keys_switch_surfaces() {
        assert_eq!(
            KeyRouter::route(InteractionMode::Conversation, false, key(KeyCode::F(2))),
            UiAction::SwitchSurface(InteractionMode::ToolBrowse)
        );
        assert_eq!(
            KeyRouter::route(InteractionMode::ToolBrowse, false, key(KeyCode::F(3))),
            UiAction::SwitchSurface(InteractionMode::Pairing)
        );
    }

    #[test]
    fn test_edit_surface_newline_vs_submit() {
        assert_eq!(
            KeyRouter::route(InteractionMode::Edit, false, key(KeyCode::Enter)),
            UiAction::Newline
        );
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(
            KeyRouter::route(InteractionMode::Edit, false, ctrl_s),
            UiAction::Submit
        );
    }

    #[test]
    fn test_tool_browse_navigation() {
        assert_eq!(
            KeyRouter::route(InteractionMode::ToolBrowse, false, key(KeyCode::Char('j'))),
            UiAction::SelectNext
        );
        assert_eq!(
            KeyRouter::route(InteractionMode::ToolBrowse, false, key(KeyCode::Up)),
            UiAction::SelectPrev
        );
        assert_eq!(
            KeyRouter::route(InteractionMode::ToolBrowse, false, key(KeyCode::Enter)),
            UiAction::SwitchSurface(InteractionMode::Form)
        );
    }
}
