//! Slash commands typed into the conversation input

use weave_domain::PermissionLevel;

/// Parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    /// `/allow <tool>`: set the tool's permission to Allow
    Allow(String),
    /// `/deny <tool>`: set the tool's permission to Deny
    Deny(String),
    /// `/ask <tool>`: set the tool's permission to Ask
    Ask(String),
    /// `/reset <tool>`: revert the tool to its catalog default
    Reset(String),
    /// `/perms`: show the effective permission table
    Perms,
    /// `/tools`: open the tool browser
    Tools,
    /// `/quit`: exit the application
    Quit,
}

impl SlashCommand {
    /// Permission level for the set-style commands
    pub fn level(&self) -> Option<PermissionLevel> {
        match self {
            SlashCommand::Allow(_) => Some(PermissionLevel::Allow),
            SlashCommand::Deny(_) => Some(PermissionLevel::Deny),
            SlashCommand::Ask(_) => Some(PermissionLevel::Ask),
            _ => None,
        }
    }
}

/// Parse an input line. Returns `Ok(None)` for ordinary messages,
/// `Err` for a malformed slash command (shown as a notice, not submitted).
pub fn parse(input: &str) -> Result<Option<SlashCommand>, String> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Ok(None);
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(format!("too many arguments for {}", command));
    }

    let require_tool = |arg: Option<&str>| {
        arg.map(str::to_string)
            .ok_or_else(|| format!("usage: {} <tool>", command))
    };

    match command {
        "/allow" => Ok(Some(SlashCommand::Allow(require_tool(arg)?))),
        "/deny" => Ok(Some(SlashCommand::Deny(require_tool(arg)?))),
        "/ask" => Ok(Some(SlashCommand::Ask(require_tool(arg)?))),
        "/reset" => Ok(Some(SlashCommand::Reset(require_tool(arg)?))),
        "/perms" => Ok(Some(SlashCommand::Perms)),
        "/tools" => Ok(Some(SlashCommand::Tools)),
        "/quit" | "/exit" => Ok(Some(SlashCommand::Quit)),
        other => Err(format!("unknown command: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_message_is_not_a_command() {
        assert_eq!(parse("hello world").unwrap(), None);
        assert_eq!(parse("  leading spaces").unwrap(), None);
    }

    #[test]
    fn test_permission_commands() {
        assert_eq!(
            parse("/allow read_file").unwrap(),
            Some(SlashCommand::Allow("read_file".into()))
        );
        assert_eq!(
            parse("/deny run_command").unwrap(),
            Some(SlashCommand::Deny("run_command".into()))
        );
        assert_eq!(
            parse("/reset write_file").unwrap(),
            Some(SlashCommand::Reset("write_file".into()))
        );
        assert_eq!(
            parse("/allow x").unwrap().unwrap().level(),
            Some(PermissionLevel::Allow)
        );
    }

    #[test]
    fn test_bare_commands() {
        assert_eq!(parse("/perms").unwrap(), Some(SlashCommand::Perms));
        assert_eq!(parse("/tools").unwrap(), Some(SlashCommand::Tools));
        assert_eq!(parse("/quit").unwrap(), Some(SlashCommand::Quit));
        assert_eq!(parse("/exit").unwrap(), Some(SlashCommand::Quit));
    }

    #[test]
    fn test_malformed_commands() {
        assert!(parse("/allow").is_err());
        assert!(parse("/allow a b").is_err());
        assert!(parse("/frobnicate").is_err());
    }
}
