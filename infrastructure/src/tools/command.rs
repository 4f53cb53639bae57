//! System tool: run_command

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use weave_domain::{ToolCall, ToolCategory, ToolDefinition, ToolError, ToolParameter, ToolResult};

/// Tool name constant
pub const RUN_COMMAND: &str = "run_command";

/// Default timeout for command execution (60 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Maximum output size (1 MB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

pub fn run_command_definition() -> ToolDefinition {
    ToolDefinition::new(
        RUN_COMMAND,
        "Execute a shell command and return its output. Use with caution.",
        ToolCategory::System,
        true,
    )
    .with_parameter(ToolParameter::new("command", "The command to execute", true))
    .with_parameter(
        ToolParameter::new("working_dir", "Working directory for the command", false)
            .with_type("path"),
    )
    .with_parameter(
        ToolParameter::new("timeout_secs", "Timeout in seconds (default: 60)", false)
            .with_type("number"),
    )
}

/// Execute the run_command tool.
///
/// `default_working_dir` comes from configuration and applies when the call
/// itself does not name one.
pub async fn execute_run_command(call: &ToolCall, default_working_dir: Option<&str>) -> ToolResult {
    let start = Instant::now();

    let command_str = match call.require_string("command") {
        Ok(c) => c,
        Err(e) => return ToolResult::failure(RUN_COMMAND, ToolError::invalid_argument(e)),
    };
    let working_dir = call.get_string("working_dir").or(default_working_dir);
    let timeout_secs = call
        .get_i64("timeout_secs")
        .unwrap_or(DEFAULT_TIMEOUT_SECS as i64)
        .max(1) as u64;

    let mut cmd = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", command_str]);
        c
    } else {
        let mut c = Command::new("sh");
        c.args(["-c", command_str]);
        c
    };

    if let Some(dir) = working_dir {
        let path = Path::new(dir);
        if !path.exists() {
            return ToolResult::failure(
                RUN_COMMAND,
                ToolError::not_found(format!("Working directory does not exist: {}", dir)),
            );
        }
        if !path.is_dir() {
            return ToolResult::failure(
                RUN_COMMAND,
                ToolError::invalid_argument(format!("'{}' is not a directory", dir)),
            );
        }
        cmd.current_dir(path);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    let child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            return ToolResult::failure(
                RUN_COMMAND,
                ToolError::execution_failed(format!("Failed to spawn command: {}", e)),
            );
        }
    };

    let output = match tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        child.wait_with_output(),
    )
    .await
    {
        Ok(Ok(o)) => o,
        Ok(Err(e)) => {
            return ToolResult::failure(
                RUN_COMMAND,
                ToolError::execution_failed(format!("Failed to wait for command: {}", e)),
            );
        }
        Err(_) => {
            return ToolResult::failure(
                RUN_COMMAND,
                ToolError::timeout(format!(
                    "Command timed out after {} seconds",
                    timeout_secs
                )),
            );
        }
    };

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let mut combined = String::new();
    combined.push_str(&stdout);
    if !stderr.is_empty() {
        if !combined.is_empty() {
            combined.push_str("\n--- stderr ---\n");
        }
        combined.push_str(&stderr);
    }
    if combined.len() > MAX_OUTPUT_SIZE {
        // The cap can land mid-character; walk back to a boundary
        let mut cut = MAX_OUTPUT_SIZE;
        while !combined.is_char_boundary(cut) {
            cut -= 1;
        }
        combined.truncate(cut);
        combined.push_str("\n... (output truncated)");
    }

    // Non-zero exit is still a successful invocation; the model decides
    // what to do with the exit code.
    let output_text = if output.status.success() {
        combined
    } else {
        format!("Command exited with code {}\n{}", exit_code, combined)
    };

    ToolResult::success(RUN_COMMAND, output_text).with_duration(start.elapsed().as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_command_echo() {
        let call = ToolCall::new(RUN_COMMAND).with_arg("command", "echo hello");
        let result = execute_run_command(&call, None).await;

        assert!(result.is_success());
        assert!(result.output().unwrap().contains("hello"));
    }

    #[tokio::test]
    async fn test_run_command_nonzero_exit() {
        let call = ToolCall::new(RUN_COMMAND).with_arg("command", "exit 3");
        let result = execute_run_command(&call, None).await;

        assert!(result.is_success());
        assert!(result.output().unwrap().contains("exited with code 3"));
    }

    #[tokio::test]
    async fn test_run_command_default_working_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let call = ToolCall::new(RUN_COMMAND).with_arg("command", "pwd");
        let result = execute_run_command(&call, temp_dir.path().to_str()).await;

        assert!(result.is_success());
        let dir_name = temp_dir.path().file_name().unwrap().to_str().unwrap();
        assert!(result.output().unwrap().contains(dir_name));
    }

    #[tokio::test]
    async fn test_run_command_invalid_working_dir() {
        let call = ToolCall::new(RUN_COMMAND)
            .with_arg("command", "echo test")
            .with_arg("working_dir", "/nonexistent/directory");
        let result = execute_run_command(&call, None).await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_run_command_timeout() {
        let call = ToolCall::new(RUN_COMMAND)
            .with_arg("command", "sleep 5")
            .with_arg("timeout_secs", 1i64);
        let result = execute_run_command(&call, None).await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "TIMEOUT");
    }

    #[tokio::test]
    async fn test_run_command_truncates_multibyte_output() {
        // Output past the 1 MB cap, all two-byte characters, so the cap
        // lands mid-character unless the truncation respects boundaries
        let call = ToolCall::new(RUN_COMMAND).with_arg("command", "yes é | head -c 1100000");
        let result = execute_run_command(&call, None).await;

        assert!(result.is_success());
        let output = result.output().unwrap();
        assert!(output.contains("output truncated"));
        assert!(output.len() <= MAX_OUTPUT_SIZE + 64);
    }

    #[tokio::test]
    async fn test_run_command_missing_command() {
        let call = ToolCall::new(RUN_COMMAND);
        let result = execute_run_command(&call, None).await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }
}
