//! TUI application loop
//!
//! ```text
//! TuiApp (select! loop)                 ChatController (tokio::spawn)
//!   ├─ crossterm EventStream              ├─ command inbox
//!   └─ UiEvent receiver                   └─ UiEvent outbox
//!        └── ControllerHandle ──────>─────┘
//! ```
//!
//! Keys become [`UiAction`]s via the router, actions become controller
//! commands or local state edits, and controller events flow back into
//! [`TuiState::apply`]. The loop owns no session logic; refusals (busy
//! submit, blocked surface switch) arrive as events or outcomes and are
//! shown on the status line.

use super::command::{self, SlashCommand};
use super::keys::{KeyRouter, UiAction};
use super::render;
use super::state::{FormState, TuiState};
use super::surface::SwitchOutcome;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use tokio::sync::mpsc;
use tracing::debug;
use weave_application::{ApprovalDecision, ControllerHandle, UiEvent};
use weave_domain::InteractionMode;

/// Main TUI application
pub struct TuiApp {
    handle: ControllerHandle,
    events: mpsc::UnboundedReceiver<UiEvent>,
    state: TuiState,
}

impl TuiApp {
    pub fn new(
        handle: ControllerHandle,
        events: mpsc::UnboundedReceiver<UiEvent>,
        state: TuiState,
    ) -> Self {
        Self {
            handle,
            events,
            state,
        }
    }

    /// Run until the user quits or the controller stops
    pub async fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Populate the tool browser's permission column
        let _ = self.handle.query_permissions().await;

        let mut term_events = EventStream::new();
        let result = loop {
            if let Err(e) = terminal.draw(|frame| render::draw(frame, &self.state)) {
                break Err(e);
            }
            if self.state.should_quit {
                break Ok(());
            }

            tokio::select! {
                maybe_event = self.events.recv() => {
                    match maybe_event {
                        Some(event) => self.state.apply(event),
                        // Controller stopped; nothing more to render
                        None => break Ok(()),
                    }
                }
                maybe_term = term_events.next() => {
                    match maybe_term {
                        Some(Ok(Event::Key(key))) => self.on_key(key).await,
                        Some(Ok(_)) => {}
                        Some(Err(e)) => break Err(e),
                        None => break Ok(()),
                    }
                }
            }
        };

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    async fn on_key(&mut self, key: crossterm::event::KeyEvent) {
        let action = KeyRouter::route(
            self.state.surfaces.active(),
            self.state.approval.is_some(),
            key,
        );
        self.dispatch(action).await;
    }

    async fn dispatch(&mut self, action: UiAction) {
        match action {
            UiAction::InsertChar(c) => self.edit_active_buffer(|buf| buf.push(c)),
            UiAction::DeleteChar => self.edit_active_buffer(|buf| {
                buf.pop();
            }),
            UiAction::Newline => {
                if self.state.surfaces.active() == InteractionMode::Edit {
                    self.state.editor.push('\n');
                }
            }
            UiAction::Submit => self.submit_active_surface().await,
            UiAction::ScrollUp => self.state.scroll = self.state.scroll.saturating_add(1),
            UiAction::ScrollDown => self.state.scroll = self.state.scroll.saturating_sub(1),
            UiAction::SelectPrev => match self.state.surfaces.active() {
                InteractionMode::Form => {
                    if let Some(form) = &mut self.state.form {
                        form.prev_field();
                    }
                }
                _ => self.state.select_prev_tool(),
            },
            UiAction::SelectNext => match self.state.surfaces.active() {
                InteractionMode::Form => {
                    if let Some(form) = &mut self.state.form {
                        form.next_field();
                    }
                }
                _ => self.state.select_next_tool(),
            },
            UiAction::SwitchSurface(target) => self.switch_surface(target),
            UiAction::ApproveOnce => self.resolve(ApprovalDecision::ApproveOnce).await,
            UiAction::ApproveSession => self.resolve(ApprovalDecision::ApproveSession).await,
            UiAction::Deny => self.resolve(ApprovalDecision::Deny).await,
            UiAction::CancelSession => {
                let _ = self.handle.cancel().await;
            }
            UiAction::Quit => self.quit().await,
            UiAction::None => {}
        }
    }

    /// The text buffer owned by the active surface
    fn edit_active_buffer(&mut self, edit: impl FnOnce(&mut String)) {
        match self.state.surfaces.active() {
            InteractionMode::Conversation => edit(&mut self.state.input),
            InteractionMode::Pairing => edit(&mut self.state.pairing_code),
            InteractionMode::Edit => edit(&mut self.state.editor),
            InteractionMode::Form => {
                if let Some(form) = &mut self.state.form {
                    let field = form.field;
                    if let Some(value) = form.values.get_mut(field) {
                        edit(value);
                    }
                }
            }
            InteractionMode::ToolBrowse => {}
        }
    }

    async fn submit_active_surface(&mut self) {
        match self.state.surfaces.active() {
            InteractionMode::Conversation => {
                let input = std::mem::take(&mut self.state.input);
                self.submit_conversation_line(input).await;
            }
            InteractionMode::Pairing => {
                let code = std::mem::take(&mut self.state.pairing_code);
                if !code.trim().is_empty() {
                    let _ = self.handle.pair(code.trim()).await;
                }
            }
            InteractionMode::Edit => {
                let text = std::mem::take(&mut self.state.editor);
                if !text.trim().is_empty() {
                    let _ = self.handle.submit(text).await;
                    self.switch_surface(InteractionMode::Conversation);
                }
            }
            InteractionMode::Form => {
                if let Some(form) = &self.state.form {
                    let _ = self.handle.invoke_manual(form.to_call()).await;
                    self.switch_surface(InteractionMode::Conversation);
                }
            }
            InteractionMode::ToolBrowse => {}
        }
    }

    async fn submit_conversation_line(&mut self, input: String) {
        if input.trim().is_empty() {
            return;
        }
        match command::parse(&input) {
            Ok(None) => {
                let _ = self.handle.submit(input).await;
            }
            Ok(Some(cmd)) => self.run_slash_command(cmd).await,
            Err(message) => self.state.status = Some(message),
        }
    }

    async fn run_slash_command(&mut self, cmd: SlashCommand) {
        match &cmd {
            SlashCommand::Allow(tool) | SlashCommand::Deny(tool) | SlashCommand::Ask(tool) => {
                if let Some(level) = cmd.level() {
                    let _ = self.handle.set_permission(tool.clone(), level).await;
                    let _ = self.handle.query_permissions().await;
                }
            }
            SlashCommand::Reset(tool) => {
                let _ = self.handle.reset_permission(tool.clone()).await;
                let _ = self.handle.query_permissions().await;
            }
            SlashCommand::Perms => {
                let _ = self.handle.query_permissions().await;
                self.switch_surface(InteractionMode::ToolBrowse);
            }
            SlashCommand::Tools => self.switch_surface(InteractionMode::ToolBrowse),
            SlashCommand::Quit => self.quit().await,
        }
    }

    fn switch_surface(&mut self, target: InteractionMode) {
        match self.state.surfaces.request_switch(target) {
            SwitchOutcome::Switched(mode) => {
                // Entering the form builds it from the browser selection
                if mode == InteractionMode::Form
                    && let Some(tool) = self.state.selected_tool_def().cloned()
                {
                    self.state.form = Some(FormState::new(tool));
                }
            }
            SwitchOutcome::Refused(reason) => {
                debug!(target = %target, "surface switch refused");
                self.state.status = Some(reason);
            }
        }
    }

    async fn resolve(&mut self, decision: ApprovalDecision) {
        let _ = self.handle.resolve(decision).await;
    }

    async fn quit(&mut self) {
        let _ = self.handle.shutdown().await;
        self.state.should_quit = true;
    }
}
