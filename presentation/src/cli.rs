//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for weave
#[derive(Parser, Debug)]
#[command(name = "weave")]
#[command(author, version, about = "Terminal chat client for the weave mesh daemon")]
#[command(long_about = r#"
Weave is an interactive terminal client that streams conversations through
the local mesh daemon and lets the model call local tools under a
per-session permission policy (allow / ask / deny per tool).

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./weave.toml        Project-level config
3. ~/.config/weave/config.toml   Global config

Example:
  weave                          Start the interactive TUI
  weave "summarize src/main.rs"  One-shot prompt, plain console output
  weave --read-only "explore"    Restrict tools to read-only ones
"#)]
pub struct Cli {
    /// One-shot prompt; without it, the interactive TUI starts
    pub prompt: Option<String>,

    /// Force plain console output even for an interactive terminal
    #[arg(long)]
    pub no_tui: bool,

    /// Restrict the tool catalog to read-only tools
    #[arg(long)]
    pub read_only: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Override the daemon URL from configuration
    #[arg(long, value_name = "URL")]
    pub daemon_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_prompt() {
        let cli = Cli::parse_from(["weave", "hello there"]);
        assert_eq!(cli.prompt.as_deref(), Some("hello there"));
        assert!(!cli.no_tui);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from(["weave", "-vv", "--read-only", "--no-tui"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.read_only);
        assert!(cli.no_tui);
        assert!(cli.prompt.is_none());
    }

    #[test]
    fn test_daemon_url_override() {
        let cli = Cli::parse_from(["weave", "--daemon-url", "http://10.0.0.5:7777"]);
        assert_eq!(cli.daemon_url.as_deref(), Some("http://10.0.0.5:7777"));
    }
}
