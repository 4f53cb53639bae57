//! Conversation transcript
//!
//! Ordered record of everything the conversation surface renders and the
//! gateway replays to the model: user messages, assistant output (with an
//! `interrupted` flag for cancelled partials), tool results in the order the
//! calls were issued, and out-of-band notices (failures, cancellations).

use crate::tool::value_objects::ToolResult;
use serde::{Deserialize, Serialize};

/// One entry in the conversation transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TranscriptEntry {
    /// A message submitted by the user
    User { text: String },
    /// Assistant output; `interrupted` marks a cancelled partial
    Assistant { text: String, interrupted: bool },
    /// Outcome of one tool call (success, failure, or rejection)
    Tool { result: ToolResult },
    /// Out-of-band note: session failure detail, cancellation marker
    Notice { text: String },
}

impl TranscriptEntry {
    pub fn user(text: impl Into<String>) -> Self {
        TranscriptEntry::User { text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        TranscriptEntry::Assistant {
            text: text.into(),
            interrupted: false,
        }
    }

    pub fn interrupted(text: impl Into<String>) -> Self {
        TranscriptEntry::Assistant {
            text: text.into(),
            interrupted: true,
        }
    }

    pub fn tool(result: ToolResult) -> Self {
        TranscriptEntry::Tool { result }
    }

    pub fn notice(text: impl Into<String>) -> Self {
        TranscriptEntry::Notice { text: text.into() }
    }
}

/// Append-only transcript of one conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// Tool results in transcript (request) order
    pub fn tool_results(&self) -> impl Iterator<Item = &ToolResult> {
        self.entries.iter().filter_map(|e| match e {
            TranscriptEntry::Tool { result } => Some(result),
            _ => None,
        })
    }
}
