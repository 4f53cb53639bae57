//! Filesystem tools: read_file, write_file, list_dir

use std::fs;
use std::path::Path;
use std::time::Instant;
use weave_domain::{ToolCall, ToolCategory, ToolDefinition, ToolError, ToolParameter, ToolResult};

/// Tool name constants
pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
pub const LIST_DIR: &str = "list_dir";

/// Maximum file size to read (10 MB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum number of directory entries to list
const MAX_DIR_ENTRIES: usize = 2000;

pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        READ_FILE,
        "Read the contents of a file at the specified path",
        ToolCategory::Filesystem,
        false,
    )
    .with_parameter(ToolParameter::new("path", "Path to the file to read", true).with_type("path"))
    .with_parameter(
        ToolParameter::new(
            "offset",
            "Line number to start reading from (0-indexed)",
            false,
        )
        .with_type("number"),
    )
    .with_parameter(
        ToolParameter::new("limit", "Maximum number of lines to read", false).with_type("number"),
    )
}

pub fn write_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        WRITE_FILE,
        "Write content to a file. Creates the file if it doesn't exist, overwrites if it does.",
        ToolCategory::Filesystem,
        true,
    )
    .with_parameter(ToolParameter::new("path", "Path to the file to write", true).with_type("path"))
    .with_parameter(ToolParameter::new("content", "Content to write", true))
    .with_parameter(
        ToolParameter::new(
            "create_dirs",
            "Create parent directories if they don't exist",
            false,
        )
        .with_type("boolean"),
    )
}

pub fn list_dir_definition() -> ToolDefinition {
    ToolDefinition::new(
        LIST_DIR,
        "List the entries of a directory, one per line, directories suffixed with '/'",
        ToolCategory::Filesystem,
        false,
    )
    .with_parameter(
        ToolParameter::new("path", "Path to the directory to list", true).with_type("path"),
    )
}

/// Execute the read_file tool
pub fn execute_read_file(call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let path_str = match call.require_string("path") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(READ_FILE, ToolError::invalid_argument(e)),
    };
    let path = Path::new(path_str);

    if !path.exists() {
        return ToolResult::failure(READ_FILE, ToolError::not_found(path_str));
    }
    if !path.is_file() {
        return ToolResult::failure(
            READ_FILE,
            ToolError::invalid_argument(format!("'{}' is not a file", path_str)),
        );
    }

    match fs::metadata(path) {
        Ok(m) if m.len() > MAX_READ_SIZE => {
            return ToolResult::failure(
                READ_FILE,
                ToolError::invalid_argument(format!(
                    "File too large ({} bytes). Maximum size is {} bytes",
                    m.len(),
                    MAX_READ_SIZE
                )),
            );
        }
        Ok(_) => {}
        Err(e) => {
            return ToolResult::failure(
                READ_FILE,
                ToolError::execution_failed(format!("Failed to stat file: {}", e)),
            );
        }
    }

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            return ToolResult::failure(
                READ_FILE,
                ToolError::execution_failed(format!("Failed to read file: {}", e)),
            );
        }
    };

    // Optional line window
    let offset = call.get_i64("offset").unwrap_or(0).max(0) as usize;
    let limit = call.get_i64("limit");

    let output = if offset > 0 || limit.is_some() {
        let lines: Vec<&str> = content.lines().collect();
        if offset >= lines.len() {
            String::new()
        } else {
            let end = match limit {
                Some(l) => (offset + l.max(0) as usize).min(lines.len()),
                None => lines.len(),
            };
            lines[offset..end].join("\n")
        }
    } else {
        content
    };

    ToolResult::success(READ_FILE, output).with_duration(start.elapsed().as_millis() as u64)
}

/// Execute the write_file tool
pub fn execute_write_file(call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let path_str = match call.require_string("path") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(WRITE_FILE, ToolError::invalid_argument(e)),
    };
    let content = match call.require_string("content") {
        Ok(c) => c,
        Err(e) => return ToolResult::failure(WRITE_FILE, ToolError::invalid_argument(e)),
    };

    let path = Path::new(path_str);
    let create_dirs = call.get_bool("create_dirs").unwrap_or(false);

    if create_dirs
        && let Some(parent) = path.parent()
        && !parent.exists()
        && let Err(e) = fs::create_dir_all(parent)
    {
        return ToolResult::failure(
            WRITE_FILE,
            ToolError::execution_failed(format!("Failed to create parent directories: {}", e)),
        );
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        return ToolResult::failure(
            WRITE_FILE,
            ToolError::not_found(format!(
                "Parent directory does not exist: {}",
                parent.display()
            )),
        );
    }

    let bytes = content.len();
    if let Err(e) = fs::write(path, content) {
        return ToolResult::failure(
            WRITE_FILE,
            ToolError::execution_failed(format!("Failed to write file: {}", e)),
        );
    }

    ToolResult::success(
        WRITE_FILE,
        format!("Wrote {} bytes to {}", bytes, path_str),
    )
    .with_duration(start.elapsed().as_millis() as u64)
}

/// Execute the list_dir tool
pub fn execute_list_dir(call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let path_str = match call.require_string("path") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(LIST_DIR, ToolError::invalid_argument(e)),
    };
    let path = Path::new(path_str);

    if !path.exists() {
        return ToolResult::failure(LIST_DIR, ToolError::not_found(path_str));
    }
    if !path.is_dir() {
        return ToolResult::failure(
            LIST_DIR,
            ToolError::invalid_argument(format!("'{}' is not a directory", path_str)),
        );
    }

    let entries = match fs::read_dir(path) {
        Ok(e) => e,
        Err(e) => {
            return ToolResult::failure(
                LIST_DIR,
                ToolError::execution_failed(format!("Failed to read directory: {}", e)),
            );
        }
    };

    let mut names: Vec<String> = Vec::new();
    let mut truncated = false;
    for entry in entries.flatten() {
        if names.len() >= MAX_DIR_ENTRIES {
            truncated = true;
            break;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if entry.path().is_dir() {
            names.push(format!("{}/", name));
        } else {
            names.push(name);
        }
    }
    names.sort();

    let mut output = names.join("\n");
    if truncated {
        output.push_str(&format!("\n... (limited to {} entries)", MAX_DIR_ENTRIES));
    }
    if output.is_empty() {
        output = "(empty directory)".to_string();
    }

    ToolResult::success(LIST_DIR, output).with_duration(start.elapsed().as_millis() as u64)
}
