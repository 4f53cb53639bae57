//! CLI entrypoint for weave
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weave_application::{
    ApprovalDecision, ChatController, ControllerConfig, ControllerHandle, DecisionLog,
    NullDecisionLog, UiEvent,
};
use weave_domain::{PermissionStore, TranscriptEntry};
use weave_infrastructure::{
    ConfigLoader, DaemonModelGateway, FileConfig, JsonlDecisionLog, LocalToolRunner,
    default_catalog, read_only_catalog,
};
use weave_presentation::{Cli, ConsoleFormatter, TuiApp, TuiState};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = cli.prompt.is_none() && !cli.no_tui;

    // Initialize logging based on verbosity level. The TUI owns the
    // terminal, so interactive runs log to a file instead of stderr.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let _log_guard = if interactive {
        let log_dir = ConfigLoader::global_config_path()
            .and_then(|p| p.parent().map(|d| d.to_path_buf()))
            .unwrap_or_else(std::env::temp_dir);
        let appender = tracing_appender::rolling::never(log_dir, "weave.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        None
    };

    // Load configuration, then apply CLI overrides
    let mut config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("{}", e))
            .context("failed to load configuration")?
    };
    if let Some(url) = &cli.daemon_url {
        config.daemon.url = url.clone();
    }

    info!(daemon = %config.daemon.url, "starting weave");

    // === Dependency Injection ===
    let catalog = if cli.read_only || config.tools.read_only {
        read_only_catalog()
    } else {
        default_catalog()
    };
    let tools = catalog.all().cloned().collect::<Vec<_>>();

    let gateway = Arc::new(DaemonModelGateway::new(&config.daemon.url));
    let runner = Arc::new(LocalToolRunner::new(
        catalog,
        config.tools.working_dir.clone(),
        &config.daemon.url,
    ));
    let decision_log: Arc<dyn DecisionLog> = match &config.logging.decision_log {
        Some(path) => match JsonlDecisionLog::new(path) {
            Some(log) => Arc::new(log),
            None => Arc::new(NullDecisionLog),
        },
        None => Arc::new(NullDecisionLog),
    };
    let permissions = PermissionStore::new().with_overrides(config.permissions.clone());
    let controller_config = ControllerConfig {
        max_tool_rounds: config.session.max_tool_rounds,
    };

    let (controller, handle, events) = ChatController::new(
        gateway,
        runner,
        decision_log,
        permissions,
        controller_config,
    );
    tokio::spawn(controller.run());

    if interactive {
        let app = TuiApp::new(handle, events, TuiState::new(tools));
        app.run().await.context("terminal interface failed")?;
        Ok(())
    } else {
        let prompt = cli.prompt.clone().unwrap_or_default();
        if prompt.trim().is_empty() {
            anyhow::bail!("a prompt is required with --no-tui");
        }
        run_one_shot(handle, events, prompt).await
    }
}

/// Non-interactive path: submit one prompt, stream the reply to stdout,
/// auto-deny any approval request, exit when the session ends.
async fn run_one_shot(
    handle: ControllerHandle,
    mut events: mpsc::UnboundedReceiver<UiEvent>,
    prompt: String,
) -> Result<()> {
    handle
        .submit(prompt)
        .await
        .map_err(|_| anyhow::anyhow!("controller stopped before the prompt was submitted"))?;

    let mut stdout = std::io::stdout();
    let mut failed = None;
    while let Some(event) = events.recv().await {
        match event {
            UiEvent::StreamChunk(chunk) => {
                print!("{}", chunk);
                stdout.flush()?;
            }
            UiEvent::ApprovalRequested { tool, .. } => {
                println!();
                println!("{}", ConsoleFormatter::format_auto_deny(&tool));
                let _ = handle.resolve(ApprovalDecision::Deny).await;
            }
            UiEvent::TranscriptAppended(entry) => match &entry {
                // Streamed text was already printed chunk by chunk
                TranscriptEntry::Assistant { .. } => println!(),
                TranscriptEntry::User { .. } => {}
                _ => println!("{}", ConsoleFormatter::format_entry(&entry)),
            },
            UiEvent::SessionCompleted | UiEvent::SessionCancelled => break,
            UiEvent::SessionFailed(detail) => {
                failed = Some(detail);
                break;
            }
            _ => {}
        }
    }

    let _ = handle.shutdown().await;
    match failed {
        Some(detail) => anyhow::bail!("session failed: {}", detail),
        None => Ok(()),
    }
}
