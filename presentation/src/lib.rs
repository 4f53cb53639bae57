//! Presentation layer for weave
//!
//! This crate contains CLI definitions, console output formatting,
//! and the interactive terminal interface.

pub mod cli;
pub mod output;
pub mod tui;

// Re-export commonly used types
pub use cli::Cli;
pub use output::ConsoleFormatter;
pub use tui::{SurfaceController, SwitchOutcome, TuiApp, TuiState};
