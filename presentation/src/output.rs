//! Console output formatting for the one-shot (non-TUI) path

use colored::Colorize;
use weave_domain::{ToolResult, TranscriptEntry};

/// Formats controller output for plain console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render one transcript entry as console lines
    pub fn format_entry(entry: &TranscriptEntry) -> String {
        match entry {
            TranscriptEntry::User { text } => {
                format!("{} {}", "you:".cyan().bold(), text)
            }
            TranscriptEntry::Assistant { text, interrupted } => {
                let mut out = text.clone();
                if *interrupted {
                    out.push_str(&format!(" {}", "[interrupted]".yellow()));
                }
                out
            }
            TranscriptEntry::Tool { result } => Self::format_tool_result(result),
            TranscriptEntry::Notice { text } => format!("{}", text.dimmed()),
        }
    }

    /// Render a tool outcome as a single status line
    pub fn format_tool_result(result: &ToolResult) -> String {
        if result.is_success() {
            format!(
                "{} {} {}",
                "tool".green().bold(),
                result.tool_name,
                result.preview().dimmed()
            )
        } else {
            format!(
                "{} {} {}",
                "tool".red().bold(),
                result.tool_name,
                result.preview().red()
            )
        }
    }

    /// Render a suspended approval request (one-shot mode auto-denies, the
    /// line tells the user why nothing ran)
    pub fn format_auto_deny(tool: &str) -> String {
        format!(
            "{} '{}' requires approval; denied in non-interactive mode",
            "skipped:".yellow().bold(),
            tool
        )
    }
}
