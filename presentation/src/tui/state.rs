//! TUI view state
//!
//! [`TuiState`] is the single mutable snapshot the renderer draws from.
//! It is updated from two directions: key-driven edits (input buffers,
//! selections) in the app loop, and controller [`UiEvent`]s applied by
//! [`TuiState::apply`]. It holds no business logic; refusals and
//! permission decisions all come back from the controller as events.

use super::surface::SurfaceController;
use weave_application::{ApprovalDecision, UiEvent};
use weave_domain::{
    PermissionLevel, SessionState, ToolCall, ToolDefinition, TranscriptEntry,
};

/// The approval modal's content
#[derive(Debug, Clone)]
pub struct ApprovalPrompt {
    pub tool: String,
    pub args: String,
}

/// Manual invocation form for one tool
#[derive(Debug, Clone)]
pub struct FormState {
    pub tool: ToolDefinition,
    /// One input buffer per parameter, in schema order
    pub values: Vec<String>,
    /// Index of the focused field
    pub field: usize,
}

impl FormState {
    pub fn new(tool: ToolDefinition) -> Self {
        let values = vec![String::new(); tool.parameters.len()];
        Self {
            tool,
            values,
            field: 0,
        }
    }

    pub fn next_field(&mut self) {
        if !self.values.is_empty() {
            self.field = (self.field + 1) % self.values.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.values.is_empty() {
            self.field = (self.field + self.values.len() - 1) % self.values.len();
        }
    }

    /// Build the call from the filled fields. Empty optional fields are
    /// omitted; values are coerced by the parameter's type hint.
    pub fn to_call(&self) -> ToolCall {
        let mut call = ToolCall::new(&self.tool.name);
        for (param, raw) in self.tool.parameters.iter().zip(&self.values) {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let value: serde_json::Value = match param.param_type.as_str() {
                "number" => raw
                    .parse::<i64>()
                    .map(Into::into)
                    .unwrap_or_else(|_| raw.into()),
                "boolean" => raw
                    .parse::<bool>()
                    .map(Into::into)
                    .unwrap_or_else(|_| raw.into()),
                _ => raw.into(),
            };
            call.arguments.insert(param.name.clone(), value);
        }
        call
    }
}

/// Everything the renderer needs for one frame
pub struct TuiState {
    pub surfaces: SurfaceController,
    /// Finalized transcript entries, in order
    pub transcript: Vec<TranscriptEntry>,
    /// Assistant text still streaming (not yet a transcript entry)
    pub stream_buffer: String,
    /// Mirror of the controller's session state, for the status bar
    pub session: SessionState,
    /// Open approval modal, if any
    pub approval: Option<ApprovalPrompt>,
    /// Conversation input line
    pub input: String,
    /// Multi-line composition buffer (Edit surface)
    pub editor: String,
    /// Pairing code entry (Pairing surface)
    pub pairing_code: String,
    /// Tool catalog for the browser and form
    pub tools: Vec<ToolDefinition>,
    /// Browser selection index
    pub selected_tool: usize,
    /// Effective permission table, refreshed via `/perms` and changes
    pub permissions: Vec<(String, PermissionLevel)>,
    /// Manual invocation form (Form surface)
    pub form: Option<FormState>,
    /// Transient status line message
    pub status: Option<String>,
    /// Conversation scroll offset from the bottom
    pub scroll: u16,
    pub should_quit: bool,
}

impl TuiState {
    pub fn new(tools: Vec<ToolDefinition>) -> Self {
        Self {
            surfaces: SurfaceController::new(),
            transcript: Vec::new(),
            stream_buffer: String::new(),
            session: SessionState::Idle,
            approval: None,
            input: String::new(),
            editor: String::new(),
            pairing_code: String::new(),
            tools,
            selected_tool: 0,
            permissions: Vec::new(),
            form: None,
            status: None,
            scroll: 0,
            should_quit: false,
        }
    }

    /// The currently selected tool in the browser
    pub fn selected_tool_def(&self) -> Option<&ToolDefinition> {
        self.tools.get(self.selected_tool)
    }

    pub fn select_prev_tool(&mut self) {
        self.selected_tool = self.selected_tool.saturating_sub(1);
    }

    pub fn select_next_tool(&mut self) {
        if self.selected_tool + 1 < self.tools.len() {
            self.selected_tool += 1;
        }
    }

    /// Apply one controller event to the view state
    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::SessionStarted => {
                self.session = SessionState::Streaming;
                self.stream_buffer.clear();
                self.status = None;
            }
            UiEvent::StreamChunk(chunk) => {
                self.stream_buffer.push_str(&chunk);
            }
            UiEvent::ToolRequested { tool, .. } => {
                self.status = Some(format!("model requested {}", tool));
            }
            UiEvent::ApprovalRequested { tool, args } => {
                self.session = SessionState::AwaitingApproval;
                self.approval = Some(ApprovalPrompt { tool, args });
                self.surfaces.set_approval_pending(true);
            }
            UiEvent::ApprovalResolved { tool, decision } => {
                self.approval = None;
                self.surfaces.set_approval_pending(false);
                self.session = SessionState::Streaming;
                let verb = match decision {
                    ApprovalDecision::ApproveOnce => "approved once",
                    ApprovalDecision::ApproveSession => "approved for session",
                    ApprovalDecision::Deny => "denied",
                };
                self.status = Some(format!("{}: {}", tool, verb));
            }
            UiEvent::ToolStarted { tool } => {
                self.status = Some(format!("running {}", tool));
            }
            UiEvent::ToolFinished { result } => {
                self.status = Some(format!("{}: {}", result.tool_name, result.preview()));
            }
            UiEvent::TranscriptAppended(entry) => {
                // Assistant entries replace the streaming buffer
                if matches!(entry, TranscriptEntry::Assistant { .. }) {
                    self.stream_buffer.clear();
                }
                self.transcript.push(entry);
            }
            UiEvent::SessionCompleted => {
                self.session = SessionState::Completed;
                self.clear_pending_approval();
            }
            UiEvent::SessionCancelled => {
                self.session = SessionState::Cancelled;
                self.stream_buffer.clear();
                self.clear_pending_approval();
            }
            UiEvent::SessionFailed(detail) => {
                self.session = SessionState::Failed;
                self.stream_buffer.clear();
                self.clear_pending_approval();
                self.status = Some(detail);
            }
            UiEvent::PermissionChanged { tool, level } => {
                self.status = Some(match level {
                    Some(level) => format!("{} -> {}", tool, level),
                    None => format!("{} reset to default", tool),
                });
            }
            UiEvent::Permissions(table) => {
                self.permissions = table;
            }
            UiEvent::PairingResult { success, detail } => {
                self.status = Some(if success {
                    format!("paired with {}", detail)
                } else {
                    format!("pairing failed: {}", detail)
                });
            }
            UiEvent::Notice(text) | UiEvent::Refused(text) => {
                self.status = Some(text);
            }
        }
    }

    fn clear_pending_approval(&mut self) {
        self.approval = None;
        self.surfaces.set_approval_pending(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_domain::{InteractionMode, ToolCategory, ToolParameter, ToolResult};

    fn sample_tools() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new("read_file", "Read", ToolCategory::Filesystem, false),
            ToolDefinition::new("write_file", "Write", ToolCategory::Filesystem, true),
        ]
    }

    #[test]
    fn test_stream_chunks_accumulate_until_entry_lands() {
        let mut state = TuiState::new(sample_tools());
        state.apply(UiEvent::SessionStarted);
        state.apply(UiEvent::StreamChunk("hel".into()));
        state.apply(UiEvent::StreamChunk("lo".into()));
        assert_eq!(state.stream_buffer, "hello");

        state.apply(UiEvent::TranscriptAppended(TranscriptEntry::assistant(
            "hello",
        )));
        assert!(state.stream_buffer.is_empty());
        assert_eq!(state.transcript.len(), 1);
    }

    #[test]
    fn test_approval_modal_blocks_surface_switches() {
        let mut state = TuiState::new(sample_tools());
        state.apply(UiEvent::ApprovalRequested {
            tool: "write_file".into(),
            args: "path=/tmp/x".into(),
        });

        assert!(state.approval.is_some());
        assert_eq!(state.session, SessionState::AwaitingApproval);
        assert!(matches!(
            state.surfaces.request_switch(InteractionMode::ToolBrowse),
            super::super::surface::SwitchOutcome::Refused(_)
        ));
    }

    #[test]
    fn test_resolution_clears_modal_and_unblocks() {
        let mut state = TuiState::new(sample_tools());
        state.apply(UiEvent::ApprovalRequested {
            tool: "write_file".into(),
            args: String::new(),
        });
        state.apply(UiEvent::ApprovalResolved {
            tool: "write_file".into(),
            decision: ApprovalDecision::ApproveOnce,
        });

        assert!(state.approval.is_none());
        assert!(!state.surfaces.approval_pending());
    }

    #[test]
    fn test_cancellation_clears_modal() {
        let mut state = TuiState::new(sample_tools());
        state.apply(UiEvent::ApprovalRequested {
            tool: "write_file".into(),
            args: String::new(),
        });
        state.apply(UiEvent::SessionCancelled);

        assert!(state.approval.is_none());
        assert!(!state.surfaces.approval_pending());
        assert_eq!(state.session, SessionState::Cancelled);
    }

    #[test]
    fn test_tool_finished_updates_status() {
        let mut state = TuiState::new(sample_tools());
        state.apply(UiEvent::ToolFinished {
            result: ToolResult::success("read_file", "contents"),
        });
        assert!(state.status.as_deref().unwrap().contains("read_file"));
    }

    #[test]
    fn test_form_coerces_typed_values() {
        let tool = ToolDefinition::new("read_file", "Read", ToolCategory::Filesystem, false)
            .with_parameter(ToolParameter::new("path", "Path", true).with_type("path"))
            .with_parameter(ToolParameter::new("limit", "Limit", false).with_type("number"));
        let mut form = FormState::new(tool);
        form.values[0] = "/tmp/a.txt".into();
        form.values[1] = "20".into();

        let call = form.to_call();
        assert_eq!(call.get_string("path"), Some("/tmp/a.txt"));
        assert_eq!(call.get_i64("limit"), Some(20));
    }

    #[test]
    fn test_form_omits_empty_optional_fields() {
        let tool = ToolDefinition::new("list_dir", "List", ToolCategory::Filesystem, false)
            .with_parameter(ToolParameter::new("path", "Path", true).with_type("path"));
        let form = FormState::new(tool);

        let call = form.to_call();
        assert!(call.arguments.is_empty());
    }
}
