//! The chat controller
//!
//! One actor task owning everything the tool-calling subsystem mutates: the
//! conversation transcript, the [`PermissionStore`], the
//! [`ApprovalCoordinator`], and the active session's state machine. All
//! mutation happens on this task; surfaces talk to it through the command
//! inbox and render from its event stream, and genuinely concurrent work
//! (the provider stream, tool I/O) posts exactly one event back into the
//! loop on completion.
//!
//! # Execution pipeline
//!
//! Tool calls requested mid-stream run strictly one at a time, in request
//! order:
//!
//! ```text
//! catalog lookup ── not found ──────────────► failure result
//!   └─ schema validation ── malformed ──────► failure result
//!        └─ permission check (fresh, every call)
//!             ├─ Deny ──────────────────────► "blocked by policy" result
//!             ├─ Allow ─────────────────────► invoke
//!             └─ Ask ──► suspend (awaiting-approval) ──► user decision
//!                          ├─ approve-once ──────────────► invoke
//!                          ├─ approve-session ── store=Allow ──► invoke
//!                          └─ deny ────────────────────► "denied by user" result
//! ```
//!
//! A turn that ended with tool calls triggers a continuation turn carrying
//! the results back to the model, bounded by
//! [`ControllerConfig::max_tool_rounds`].
//!
//! # Cancellation
//!
//! Cancelling bumps the session epoch; tool completions are tagged with the
//! epoch they were spawned under, so a late completion for a cancelled
//! session is dropped instead of appended.

mod command;

pub use command::{
    ControllerClosed, ControllerCommand, ControllerConfig, ControllerHandle, UiEvent,
};

use crate::approval::{ApprovalCoordinator, ApprovalDecision};
use crate::ports::decision_log::{DecisionKind, DecisionLog, DecisionRecord};
use crate::ports::model_gateway::{GatewayError, ModelGateway};
use crate::ports::tool_runner::ToolRunnerPort;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use weave_domain::{
    CallValidator, PermissionLevel, PermissionStore, SessionState, StreamEvent, ToolCall,
    ToolError, ToolResult, ToolValidator, Transcript, TranscriptEntry,
};

/// Completion posted back onto the controller queue by a spawned invocation
struct ToolCompletion {
    epoch: u64,
    result: ToolResult,
}

/// Book-keeping for the active streaming session
struct ActiveSession {
    state: SessionState,
    cancel: CancellationToken,
    /// Calls requested by the model, not yet permission-checked
    pending_calls: VecDeque<ToolCall>,
    /// Name of the invocation currently running, if any
    in_flight: Option<String>,
    /// Assistant text received so far in the current turn
    buffer: String,
    /// The provider signalled end of the current turn
    stream_done: bool,
    /// The current turn requested at least one tool call
    saw_tool_calls: bool,
    /// Continuation turns taken so far
    tool_round: usize,
    /// Form-surface invocation: no provider stream, no continuation
    manual: bool,
}

impl ActiveSession {
    fn new(manual: bool) -> Self {
        Self {
            state: SessionState::Idle,
            cancel: CancellationToken::new(),
            pending_calls: VecDeque::new(),
            in_flight: None,
            buffer: String::new(),
            stream_done: manual,
            saw_tool_calls: false,
            tool_round: 0,
            manual,
        }
    }
}

/// The single-consumer actor at the core of the client.
pub struct ChatController {
    gateway: Arc<dyn ModelGateway>,
    runner: Arc<dyn ToolRunnerPort>,
    decision_log: Arc<dyn DecisionLog>,
    config: ControllerConfig,

    permissions: PermissionStore,
    approvals: ApprovalCoordinator,
    transcript: Transcript,
    session: Option<ActiveSession>,
    /// Bumped on session start, cancellation, and failure; stale completions
    /// carry an older value and are dropped
    epoch: u64,

    commands: mpsc::Receiver<ControllerCommand>,
    events: mpsc::UnboundedSender<UiEvent>,
    stream_rx: Option<mpsc::Receiver<StreamEvent>>,
    completions_tx: mpsc::UnboundedSender<ToolCompletion>,
    completions_rx: mpsc::UnboundedReceiver<ToolCompletion>,
}

impl ChatController {
    /// Build a controller with its handle and event stream. Spawn
    /// [`run`](Self::run) on the runtime to start it.
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        runner: Arc<dyn ToolRunnerPort>,
        decision_log: Arc<dyn DecisionLog>,
        permissions: PermissionStore,
        config: ControllerConfig,
    ) -> (Self, ControllerHandle, mpsc::UnboundedReceiver<UiEvent>) {
        let (command_tx, command_rx) = mpsc::channel(64);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let controller = Self {
            gateway,
            runner,
            decision_log,
            config,
            permissions,
            approvals: ApprovalCoordinator::new(),
            transcript: Transcript::new(),
            session: None,
            epoch: 0,
            commands: command_rx,
            events: event_tx,
            stream_rx: None,
            completions_tx,
            completions_rx,
        };
        (controller, ControllerHandle::new(command_tx), event_rx)
    }

    /// Consume the controller, processing its FIFO of commands, stream
    /// events, and tool completions until shutdown.
    pub async fn run(mut self) {
        loop {
            let stream_active = self.stream_rx.is_some();
            tokio::select! {
                cmd = self.commands.recv() => {
                    match cmd {
                        None | Some(ControllerCommand::Shutdown) => break,
                        Some(cmd) => self.handle_command(cmd).await,
                    }
                }
                event = next_stream_event(&mut self.stream_rx), if stream_active => {
                    self.on_stream_event(event).await;
                }
                Some(done) = self.completions_rx.recv() => {
                    self.on_tool_completion(done).await;
                }
            }
        }
        debug!("chat controller stopped");
    }

    // ==================== command handling ====================

    async fn handle_command(&mut self, command: ControllerCommand) {
        match command {
            ControllerCommand::Submit(text) => self.handle_submit(text).await,
            ControllerCommand::Cancel => self.handle_cancel(),
            ControllerCommand::Resolve(decision) => self.handle_resolve(decision).await,
            ControllerCommand::SetPermission { tool, level } => {
                self.handle_set_permission(tool, level)
            }
            ControllerCommand::ResetPermission { tool } => self.handle_reset_permission(tool),
            ControllerCommand::QueryPermissions => {
                let table = self.permissions.effective(self.runner.catalog());
                self.send_event(UiEvent::Permissions(table));
            }
            ControllerCommand::InvokeManual(call) => self.handle_manual(call).await,
            ControllerCommand::Pair(code) => self.handle_pair(code),
            ControllerCommand::Shutdown => unreachable!("handled in run loop"),
        }
    }

    async fn handle_submit(&mut self, text: String) {
        if !self.session_state().accepts_submit() {
            self.send_event(UiEvent::Refused(
                "a response is still in progress".to_string(),
            ));
            return;
        }

        info!("starting streaming session");
        self.append(TranscriptEntry::user(text));
        self.epoch += 1;
        self.session = Some(ActiveSession::new(false));
        self.set_state(SessionState::Streaming);
        self.send_event(UiEvent::SessionStarted);

        if let Err(e) = self.start_stream().await {
            self.fail_session(&format!("model provider error: {}", e));
        }
    }

    fn handle_cancel(&mut self) {
        let buffer = match self.session.as_mut() {
            Some(s) if !s.state.is_terminal() => {
                s.cancel.cancel();
                std::mem::take(&mut s.buffer)
            }
            _ => {
                self.send_event(UiEvent::Notice("nothing to cancel".to_string()));
                return;
            }
        };

        self.stream_rx = None;
        self.epoch += 1;

        if let Some(call) = self.approvals.discard_as_denied() {
            debug!(tool = %call.tool_name, "pending approval discarded as denied");
            self.decision_log.record(DecisionRecord::for_tool(
                DecisionKind::Cancelled,
                call.tool_name,
                "pending approval discarded by session cancellation",
            ));
        }

        if !buffer.is_empty() {
            self.append(TranscriptEntry::interrupted(buffer));
        }
        self.append(TranscriptEntry::notice("response cancelled by user"));
        self.set_state(SessionState::Cancelled);
        self.send_event(UiEvent::SessionCancelled);
        self.decision_log.record(DecisionRecord::new(
            DecisionKind::Cancelled,
            "session cancelled by user",
        ));
    }

    async fn handle_resolve(&mut self, decision: ApprovalDecision) {
        let Some((call, decision)) = self.approvals.resolve(decision) else {
            self.send_event(UiEvent::Notice("no approval is pending".to_string()));
            return;
        };

        info!(tool = %call.tool_name, decision = %decision, "approval resolved");
        self.send_event(UiEvent::ApprovalResolved {
            tool: call.tool_name.clone(),
            decision,
        });
        self.set_state(SessionState::Streaming);

        match decision {
            ApprovalDecision::Deny => {
                self.decision_log.record(DecisionRecord::for_tool(
                    DecisionKind::Denied,
                    call.tool_name.clone(),
                    "denied by user",
                ));
                let tool = call.tool_name;
                self.finish_call(ToolResult::failure(&tool, ToolError::denied_by_user(&tool)));
                self.try_advance();
                self.try_finish_turn().await;
            }
            ApprovalDecision::ApproveSession => {
                // The store is updated before the invocation proceeds, so
                // every later call to this tool skips the approval step.
                self.permissions
                    .set(&call.tool_name, PermissionLevel::Allow);
                self.decision_log.record(DecisionRecord::for_tool(
                    DecisionKind::ApprovedForSession,
                    call.tool_name.clone(),
                    "approved for the rest of the session",
                ));
                self.send_event(UiEvent::PermissionChanged {
                    tool: call.tool_name.clone(),
                    level: Some(PermissionLevel::Allow),
                });
                self.start_invocation(call);
            }
            ApprovalDecision::ApproveOnce => {
                self.decision_log.record(DecisionRecord::for_tool(
                    DecisionKind::ApprovedOnce,
                    call.tool_name.clone(),
                    "approved for this call only",
                ));
                self.start_invocation(call);
            }
        }
    }

    fn handle_set_permission(&mut self, tool: String, level: PermissionLevel) {
        if !self.runner.has_tool(&tool) {
            self.send_event(UiEvent::Refused(format!("unknown tool: {}", tool)));
            return;
        }
        self.permissions.set(&tool, level);
        self.decision_log.record(DecisionRecord::for_tool(
            DecisionKind::PermissionChanged,
            tool.clone(),
            format!("permission set to {}", level),
        ));
        self.send_event(UiEvent::PermissionChanged {
            tool,
            level: Some(level),
        });
    }

    fn handle_reset_permission(&mut self, tool: String) {
        if !self.runner.has_tool(&tool) {
            self.send_event(UiEvent::Refused(format!("unknown tool: {}", tool)));
            return;
        }
        self.permissions.reset(&tool);
        self.decision_log.record(DecisionRecord::for_tool(
            DecisionKind::PermissionReset,
            tool.clone(),
            "permission reset to default",
        ));
        self.send_event(UiEvent::PermissionChanged { tool, level: None });
    }

    async fn handle_manual(&mut self, call: ToolCall) {
        if !self.session_state().accepts_submit() {
            self.send_event(UiEvent::Refused(
                "a response is still in progress".to_string(),
            ));
            return;
        }

        info!(tool = %call.tool_name, "manual tool invocation");
        self.epoch += 1;
        self.session = Some(ActiveSession::new(true));
        self.set_state(SessionState::Streaming);
        self.send_event(UiEvent::SessionStarted);

        if let Some(s) = self.session.as_mut() {
            s.pending_calls.push_back(call);
        }
        self.try_advance();
        self.try_finish_turn().await;
    }

    fn handle_pair(&mut self, code: String) {
        // Pairing is plain request/response glue; run it off the loop so a
        // slow daemon cannot stall approvals or cancellation.
        let gateway = self.gateway.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match gateway.pair(&code).await {
                Ok(peer) => UiEvent::PairingResult {
                    success: true,
                    detail: format!("paired with {}", peer),
                },
                Err(e) => UiEvent::PairingResult {
                    success: false,
                    detail: e.to_string(),
                },
            };
            let _ = events.send(event);
        });
    }

    // ==================== stream handling ====================

    async fn on_stream_event(&mut self, event: Option<StreamEvent>) {
        let Some(event) = event else {
            self.fail_session("model stream closed unexpectedly");
            return;
        };

        match event {
            StreamEvent::Delta(chunk) => {
                if let Some(s) = self.session.as_mut() {
                    s.buffer.push_str(&chunk);
                }
                self.send_event(UiEvent::StreamChunk(chunk));
            }
            StreamEvent::ToolCallRequest(call) => {
                debug!(tool = %call.tool_name, "model requested tool call");
                self.send_event(UiEvent::ToolRequested {
                    tool: call.tool_name.clone(),
                    args: call.args_preview(),
                });
                if let Some(s) = self.session.as_mut() {
                    s.pending_calls.push_back(call);
                }
                self.try_advance();
                self.try_finish_turn().await;
            }
            StreamEvent::Completed => {
                self.stream_rx = None;
                if let Some(s) = self.session.as_mut() {
                    s.stream_done = true;
                }
                self.try_advance();
                self.try_finish_turn().await;
            }
            StreamEvent::Error(e) => {
                self.fail_session(&format!("model stream error: {}", e));
            }
        }
    }

    // ==================== the execution pipeline ====================

    /// Start queued calls while the pipeline is unobstructed: streaming
    /// state, nothing in flight, no pending approval. Rejections loop to the
    /// next queued call; an invocation or suspension stops the scan.
    fn try_advance(&mut self) {
        loop {
            let ready = self.session_state() == SessionState::Streaming
                && self
                    .session
                    .as_ref()
                    .is_some_and(|s| s.in_flight.is_none())
                && !self.approvals.has_pending();
            if !ready {
                return;
            }

            let Some(call) = self
                .session
                .as_mut()
                .and_then(|s| s.pending_calls.pop_front())
            else {
                return;
            };

            // 1. Catalog lookup; an unknown tool is a hard per-call
            //    rejection, never silently skipped.
            let Some(definition) = self.runner.get_tool(&call.tool_name).cloned() else {
                warn!(tool = %call.tool_name, "model requested unknown tool");
                let tool = call.tool_name;
                self.finish_call(ToolResult::failure(
                    &tool,
                    ToolError::not_found(format!("unknown tool '{}'", tool)),
                ));
                continue;
            };

            // 2. Schema validation before any prompt is shown.
            if let Err(e) = CallValidator.validate(&call, &definition) {
                let tool = call.tool_name;
                self.finish_call(ToolResult::failure(&tool, ToolError::invalid_argument(e)));
                continue;
            }

            // 3. Fresh permission check on every call; the most recent
            //    write to the store always wins.
            match self.permissions.check(self.runner.catalog(), &call.tool_name) {
                PermissionLevel::Deny => {
                    info!(tool = %call.tool_name, "call blocked by policy");
                    self.decision_log.record(DecisionRecord::for_tool(
                        DecisionKind::PolicyBlocked,
                        call.tool_name.clone(),
                        "blocked by policy",
                    ));
                    let tool = call.tool_name;
                    self.finish_call(ToolResult::failure(
                        &tool,
                        ToolError::blocked_by_policy(&tool),
                    ));
                }
                PermissionLevel::Allow => {
                    self.start_invocation(call);
                    return;
                }
                PermissionLevel::Ask => {
                    let tool = call.tool_name.clone();
                    let args = call.args_preview();
                    if let Err(e) = self.approvals.open(call) {
                        // Unreachable by the one-in-flight rule; fail the
                        // call rather than corrupt the pending slot.
                        warn!(error = %e, "approval slot unexpectedly occupied");
                        self.finish_call(ToolResult::failure(
                            &tool,
                            ToolError::execution_failed(e.to_string()),
                        ));
                        continue;
                    }
                    self.set_state(SessionState::AwaitingApproval);
                    self.send_event(UiEvent::ApprovalRequested { tool, args });
                    return;
                }
            }
        }
    }

    /// Spawn the tool invocation; its completion posts exactly one event
    /// back onto the controller queue, tagged with the current epoch.
    fn start_invocation(&mut self, call: ToolCall) {
        if let Some(s) = self.session.as_mut() {
            s.in_flight = Some(call.tool_name.clone());
        }
        self.send_event(UiEvent::ToolStarted {
            tool: call.tool_name.clone(),
        });

        let epoch = self.epoch;
        let runner = self.runner.clone();
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = runner.run(&call).await;
            let _ = completions.send(ToolCompletion { epoch, result });
        });
    }

    async fn on_tool_completion(&mut self, done: ToolCompletion) {
        let stale = done.epoch != self.epoch
            || self
                .session
                .as_ref()
                .is_none_or(|s| s.state.is_terminal());
        if stale {
            debug!(tool = %done.result.tool_name, "dropping stale tool completion");
            return;
        }

        if let Some(s) = self.session.as_mut() {
            s.in_flight = None;
        }
        self.finish_call(done.result);
        self.try_advance();
        self.try_finish_turn().await;
    }

    /// Append one call's outcome to the transcript, in request order.
    fn finish_call(&mut self, result: ToolResult) {
        // Assistant text produced before this call precedes its result.
        self.flush_buffer(false);
        if let Some(s) = self.session.as_mut() {
            s.saw_tool_calls = true;
        }
        self.send_event(UiEvent::ToolFinished {
            result: result.clone(),
        });
        self.append(TranscriptEntry::tool(result));
    }

    /// Complete the turn once the stream has ended and the pipeline has
    /// drained; a turn that requested tools triggers a continuation turn
    /// instead, up to the configured round limit.
    async fn try_finish_turn(&mut self) {
        let ready = self.session.as_ref().is_some_and(|s| {
            s.state == SessionState::Streaming
                && s.stream_done
                && s.pending_calls.is_empty()
                && s.in_flight.is_none()
        }) && !self.approvals.has_pending();
        if !ready {
            return;
        }

        self.flush_buffer(false);

        let (saw_tool_calls, manual, tool_round) = {
            let s = self.session.as_ref().expect("session checked above");
            (s.saw_tool_calls, s.manual, s.tool_round)
        };

        if saw_tool_calls && !manual {
            if tool_round >= self.config.max_tool_rounds {
                warn!(rounds = tool_round, "tool round limit reached");
                self.append(TranscriptEntry::notice(
                    "tool round limit reached; response ended",
                ));
                self.complete_session();
                return;
            }
            if let Some(s) = self.session.as_mut() {
                s.tool_round += 1;
                s.saw_tool_calls = false;
                s.stream_done = false;
            }
            if let Err(e) = self.start_stream().await {
                self.fail_session(&format!("model provider error: {}", e));
            }
            return;
        }

        self.complete_session();
    }

    fn complete_session(&mut self) {
        self.set_state(SessionState::Completed);
        self.send_event(UiEvent::SessionCompleted);
        info!("streaming session completed");
    }

    fn fail_session(&mut self, detail: &str) {
        let buffer = match self.session.as_mut() {
            Some(s) if !s.state.is_terminal() => {
                s.cancel.cancel();
                std::mem::take(&mut s.buffer)
            }
            _ => return,
        };

        warn!(detail, "session failed");
        self.stream_rx = None;
        self.epoch += 1;

        if let Some(call) = self.approvals.discard_as_denied() {
            self.decision_log.record(DecisionRecord::for_tool(
                DecisionKind::Cancelled,
                call.tool_name,
                "pending approval discarded by session failure",
            ));
        }

        if !buffer.is_empty() {
            self.append(TranscriptEntry::interrupted(buffer));
        }
        self.append(TranscriptEntry::notice(format!("session failed: {}", detail)));
        self.set_state(SessionState::Failed);
        self.send_event(UiEvent::SessionFailed(detail.to_string()));
    }

    // ==================== helpers ====================

    async fn start_stream(&mut self) -> Result<(), GatewayError> {
        let cancel = self
            .session
            .as_ref()
            .map(|s| s.cancel.clone())
            .unwrap_or_default();
        let handle = self.gateway.start_turn(&self.transcript, cancel).await?;
        self.stream_rx = Some(handle.into_receiver());
        Ok(())
    }

    fn session_state(&self) -> SessionState {
        self.session
            .as_ref()
            .map(|s| s.state)
            .unwrap_or(SessionState::Idle)
    }

    fn set_state(&mut self, to: SessionState) {
        if let Some(s) = self.session.as_mut() {
            debug_assert!(
                s.state == to || s.state.can_transition(to),
                "illegal session transition {} -> {}",
                s.state,
                to
            );
            debug!(from = %s.state, to = %to, "session transition");
            s.state = to;
        }
    }

    /// Move the buffered assistant text into the transcript.
    fn flush_buffer(&mut self, interrupted: bool) {
        let buffer = self
            .session
            .as_mut()
            .map(|s| std::mem::take(&mut s.buffer))
            .unwrap_or_default();
        if buffer.is_empty() {
            return;
        }
        let entry = if interrupted {
            TranscriptEntry::interrupted(buffer)
        } else {
            TranscriptEntry::assistant(buffer)
        };
        self.append(entry);
    }

    fn append(&mut self, entry: TranscriptEntry) {
        self.transcript.push(entry.clone());
        self.send_event(UiEvent::TranscriptAppended(entry));
    }

    fn send_event(&self, event: UiEvent) {
        let _ = self.events.send(event);
    }
}

/// Receive the next provider stream event; only polled while a stream is
/// attached (see the `if stream_active` guard in the run loop).
async fn next_stream_event(
    stream_rx: &mut Option<mpsc::Receiver<StreamEvent>>,
) -> Option<StreamEvent> {
    match stream_rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
