//! Interaction modes
//!
//! Which UI surface currently owns keystrokes. Exactly one mode is active at
//! a time; the presentation layer refuses a switch while an approval prompt
//! is pending so the prompt can never be orphaned.

use serde::{Deserialize, Serialize};

/// The surface that currently owns keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionMode {
    /// The chat conversation surface
    #[default]
    Conversation,
    /// Catalog browser with per-tool permission toggles
    ToolBrowse,
    /// Daemon pairing-code entry
    Pairing,
    /// Multi-line message editor
    Edit,
    /// Manual tool invocation form
    Form,
}

impl InteractionMode {
    /// Status-line indicator string
    pub fn indicator(&self) -> &'static str {
        match self {
            InteractionMode::Conversation => "CHAT",
            InteractionMode::ToolBrowse => "TOOLS",
            InteractionMode::Pairing => "PAIR",
            InteractionMode::Edit => "EDIT",
            InteractionMode::Form => "FORM",
        }
    }

    pub fn all() -> [InteractionMode; 5] {
        [
            InteractionMode::Conversation,
            InteractionMode::ToolBrowse,
            InteractionMode::Pairing,
            InteractionMode::Edit,
            InteractionMode::Form,
        ]
    }
}

impl std::fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.indicator())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_conversation() {
        assert_eq!(InteractionMode::default(), InteractionMode::Conversation);
    }

    #[test]
    fn test_indicators_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for mode in InteractionMode::all() {
            assert!(seen.insert(mode.indicator()));
        }
    }
}
