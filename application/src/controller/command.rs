//! Controller commands, UI events, and the cloneable handle
//!
//! The controller is an actor: surfaces push [`ControllerCommand`]s into its
//! inbox through a [`ControllerHandle`] and render from the [`UiEvent`]
//! stream it emits. Commands are processed strictly in FIFO order on the
//! controller task.

use crate::approval::ApprovalDecision;
use thiserror::Error;
use tokio::sync::mpsc;
use weave_domain::{PermissionLevel, ToolCall, ToolResult, TranscriptEntry};

/// Commands sent from the surfaces to the controller task
#[derive(Debug)]
pub enum ControllerCommand {
    /// User submitted a conversation message
    Submit(String),
    /// Cancel the active session
    Cancel,
    /// Resolve the pending approval request
    Resolve(ApprovalDecision),
    /// Administrative: overwrite a tool's permission level
    SetPermission {
        tool: String,
        level: PermissionLevel,
    },
    /// Administrative: revert a tool's permission to its default
    ResetPermission { tool: String },
    /// Request the effective permission table
    QueryPermissions,
    /// Invoke a tool directly (Form surface); passes through the same
    /// pipeline as model-requested calls
    InvokeManual(ToolCall),
    /// Exchange a pairing code with the daemon
    Pair(String),
    /// Graceful shutdown
    Shutdown,
}

/// Events emitted by the controller for rendering
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// A new streaming session started
    SessionStarted,
    /// Incremental assistant text
    StreamChunk(String),
    /// The model requested a tool call (not yet permission-checked)
    ToolRequested { tool: String, args: String },
    /// A call is suspended pending the user's decision
    ApprovalRequested { tool: String, args: String },
    /// The pending approval was resolved
    ApprovalResolved {
        tool: String,
        decision: ApprovalDecision,
    },
    /// An approved call started running
    ToolStarted { tool: String },
    /// A call finished (ran, failed, or was rejected)
    ToolFinished { result: ToolResult },
    /// An entry was appended to the transcript
    TranscriptAppended(TranscriptEntry),
    /// Terminal session states
    SessionCompleted,
    SessionCancelled,
    SessionFailed(String),
    /// A permission entry changed (`None` level means reset to default)
    PermissionChanged {
        tool: String,
        level: Option<PermissionLevel>,
    },
    /// Effective permission table, in catalog order
    Permissions(Vec<(String, PermissionLevel)>),
    /// Outcome of a pairing exchange
    PairingResult { success: bool, detail: String },
    /// Informational notice
    Notice(String),
    /// A command was refused (e.g., submit while busy)
    Refused(String),
}

/// Tuning knobs for the controller
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Maximum number of tool-result continuation turns per session
    pub max_tool_rounds: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { max_tool_rounds: 8 }
    }
}

/// The controller task has stopped and its inbox is closed
#[derive(Debug, Error)]
#[error("controller task has stopped")]
pub struct ControllerClosed;

/// Cloneable sender half of the controller inbox
#[derive(Clone)]
pub struct ControllerHandle {
    commands: mpsc::Sender<ControllerCommand>,
}

impl ControllerHandle {
    pub(super) fn new(commands: mpsc::Sender<ControllerCommand>) -> Self {
        Self { commands }
    }

    pub async fn send(&self, command: ControllerCommand) -> Result<(), ControllerClosed> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ControllerClosed)
    }

    pub async fn submit(&self, text: impl Into<String>) -> Result<(), ControllerClosed> {
        self.send(ControllerCommand::Submit(text.into())).await
    }

    pub async fn cancel(&self) -> Result<(), ControllerClosed> {
        self.send(ControllerCommand::Cancel).await
    }

    pub async fn resolve(&self, decision: ApprovalDecision) -> Result<(), ControllerClosed> {
        self.send(ControllerCommand::Resolve(decision)).await
    }

    pub async fn set_permission(
        &self,
        tool: impl Into<String>,
        level: PermissionLevel,
    ) -> Result<(), ControllerClosed> {
        self.send(ControllerCommand::SetPermission {
            tool: tool.into(),
            level,
        })
        .await
    }

    pub async fn reset_permission(&self, tool: impl Into<String>) -> Result<(), ControllerClosed> {
        self.send(ControllerCommand::ResetPermission { tool: tool.into() })
            .await
    }

    pub async fn query_permissions(&self) -> Result<(), ControllerClosed> {
        self.send(ControllerCommand::QueryPermissions).await
    }

    pub async fn invoke_manual(&self, call: ToolCall) -> Result<(), ControllerClosed> {
        self.send(ControllerCommand::InvokeManual(call)).await
    }

    pub async fn pair(&self, code: impl Into<String>) -> Result<(), ControllerClosed> {
        self.send(ControllerCommand::Pair(code.into())).await
    }

    pub async fn shutdown(&self) -> Result<(), ControllerClosed> {
        self.send(ControllerCommand::Shutdown).await
    }
}
