//! Code exploration tools: glob_search, grep_search

use glob::glob;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use weave_domain::{ToolCall, ToolCategory, ToolDefinition, ToolError, ToolParameter, ToolResult};

/// Tool name constants
pub const GLOB_SEARCH: &str = "glob_search";
pub const GREP_SEARCH: &str = "grep_search";

/// Maximum number of results to return
const MAX_RESULTS: usize = 1000;

/// Maximum file size for grep (5 MB)
const MAX_GREP_FILE_SIZE: u64 = 5 * 1024 * 1024;

pub fn glob_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        GLOB_SEARCH,
        "Search for files matching a glob pattern (e.g., '**/*.rs', 'src/*.txt')",
        ToolCategory::CodeExploration,
        false,
    )
    .with_parameter(ToolParameter::new("pattern", "Glob pattern to match files", true))
    .with_parameter(
        ToolParameter::new(
            "base_dir",
            "Base directory to search from (default: current dir)",
            false,
        )
        .with_type("path"),
    )
    .with_parameter(
        ToolParameter::new("max_results", "Maximum number of results (default: 1000)", false)
            .with_type("number"),
    )
}

pub fn grep_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        GREP_SEARCH,
        "Search for a regex pattern within file contents",
        ToolCategory::CodeExploration,
        false,
    )
    .with_parameter(ToolParameter::new("pattern", "Regex pattern to search for", true))
    .with_parameter(
        ToolParameter::new("path", "File or directory to search in", true).with_type("path"),
    )
    .with_parameter(ToolParameter::new(
        "file_pattern",
        "Glob pattern to filter files (e.g., '*.rs')",
        false,
    ))
    .with_parameter(
        ToolParameter::new("case_insensitive", "Perform case-insensitive search", false)
            .with_type("boolean"),
    )
}

/// Execute the glob_search tool
pub fn execute_glob_search(call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let pattern = match call.require_string("pattern") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(GLOB_SEARCH, ToolError::invalid_argument(e)),
    };
    let base_dir = call.get_string("base_dir").unwrap_or(".");
    let max_results = call
        .get_i64("max_results")
        .map(|n| n as usize)
        .unwrap_or(MAX_RESULTS)
        .min(MAX_RESULTS);

    // Absolute and explicitly-relative patterns ignore base_dir
    let full_pattern = if pattern.starts_with('/') || pattern.starts_with("./") {
        pattern.to_string()
    } else {
        format!("{}/{}", base_dir, pattern)
    };

    let entries = match glob(&full_pattern) {
        Ok(paths) => paths,
        Err(e) => {
            return ToolResult::failure(
                GLOB_SEARCH,
                ToolError::invalid_argument(format!("Invalid glob pattern: {}", e)),
            );
        }
    };

    let mut results = Vec::new();
    for entry in entries.flatten() {
        if results.len() >= max_results {
            break;
        }
        results.push(entry.display().to_string());
    }

    let mut output = results.join("\n");
    if results.len() >= max_results {
        output.push_str(&format!("\n... (limited to {} results)", max_results));
    }
    if results.is_empty() {
        output = "No files found matching the pattern".to_string();
    }

    ToolResult::success(GLOB_SEARCH, output).with_duration(start.elapsed().as_millis() as u64)
}

/// Execute the grep_search tool
pub fn execute_grep_search(call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let pattern_str = match call.require_string("pattern") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(GREP_SEARCH, ToolError::invalid_argument(e)),
    };
    let path_str = match call.require_string("path") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(GREP_SEARCH, ToolError::invalid_argument(e)),
    };

    let path = Path::new(path_str);
    if !path.exists() {
        return ToolResult::failure(GREP_SEARCH, ToolError::not_found(path_str));
    }

    let case_insensitive = call.get_bool("case_insensitive").unwrap_or(false);
    let regex_pattern = if case_insensitive {
        format!("(?i){}", pattern_str)
    } else {
        pattern_str.to_string()
    };
    let regex = match Regex::new(&regex_pattern) {
        Ok(r) => r,
        Err(e) => {
            return ToolResult::failure(
                GREP_SEARCH,
                ToolError::invalid_argument(format!("Invalid regex pattern: {}", e)),
            );
        }
    };

    let files = if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        collect_files(path, call.get_string("file_pattern"))
    };

    let mut results = Vec::new();
    'outer: for file_path in files {
        if let Ok(meta) = fs::metadata(&file_path)
            && meta.len() > MAX_GREP_FILE_SIZE
        {
            continue;
        }
        let Ok(content) = fs::read_to_string(&file_path) else {
            continue;
        };
        let file_display = file_path.display();
        for (line_num, line) in content.lines().enumerate() {
            if regex.is_match(line) {
                results.push(format!("{}:{}: {}", file_display, line_num + 1, line));
                if results.len() >= MAX_RESULTS {
                    break 'outer;
                }
            }
        }
    }

    let mut output = results.join("\n");
    if results.len() >= MAX_RESULTS {
        output.push_str(&format!("\n... (limited to {} matches)", MAX_RESULTS));
    }
    if results.is_empty() {
        output = "No matches found".to_string();
    }

    ToolResult::success(GREP_SEARCH, output).with_duration(start.elapsed().as_millis() as u64)
}

/// Collect files from a directory, optionally filtered by a glob pattern
fn collect_files(dir: &Path, file_pattern: Option<&str>) -> Vec<PathBuf> {
    let pattern = file_pattern.unwrap_or("**/*");
    let full_pattern = format!("{}/{}", dir.display(), pattern);

    let mut files = Vec::new();
    if let Ok(paths) = glob(&full_pattern) {
        for entry in paths.flatten() {
            if entry.is_file() && files.len() < MAX_RESULTS {
                files.push(entry);
            }
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_glob_search_basic() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("one.txt"), "1").unwrap();
        fs::write(temp_dir.path().join("two.txt"), "2").unwrap();

        let call = ToolCall::new(GLOB_SEARCH)
            .with_arg("pattern", "*.txt")
            .with_arg("base_dir", temp_dir.path().to_str().unwrap());
        let result = execute_glob_search(&call);

        assert!(result.is_success());
        let output = result.output().unwrap();
        assert!(output.contains("one.txt"));
        assert!(output.contains("two.txt"));
    }

    #[test]
    fn test_glob_search_no_matches() {
        let temp_dir = tempdir().unwrap();

        let call = ToolCall::new(GLOB_SEARCH)
            .with_arg("pattern", "*.xyz")
            .with_arg("base_dir", temp_dir.path().to_str().unwrap());
        let result = execute_glob_search(&call);

        assert!(result.is_success());
        assert!(result.output().unwrap().contains("No files found"));
    }

    #[test]
    fn test_grep_search_single_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "alpha").unwrap();
        writeln!(temp_file, "needle here").unwrap();
        writeln!(temp_file, "omega").unwrap();

        let call = ToolCall::new(GREP_SEARCH)
            .with_arg("pattern", "needle")
            .with_arg("path", temp_file.path().to_str().unwrap());
        let result = execute_grep_search(&call);

        assert!(result.is_success());
        let output = result.output().unwrap();
        assert!(output.contains("needle here"));
        assert!(output.contains(":2:"));
    }

    #[test]
    fn test_grep_search_case_insensitive() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Needle").unwrap();

        let call = ToolCall::new(GREP_SEARCH)
            .with_arg("pattern", "needle")
            .with_arg("path", temp_file.path().to_str().unwrap())
            .with_arg("case_insensitive", true);
        let result = execute_grep_search(&call);

        assert!(result.is_success());
        assert!(result.output().unwrap().contains("Needle"));
    }

    #[test]
    fn test_grep_search_directory_with_filter() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a.rs"), "fn main() {}").unwrap();
        fs::write(temp_dir.path().join("b.txt"), "fn ignored").unwrap();

        let call = ToolCall::new(GREP_SEARCH)
            .with_arg("pattern", "fn")
            .with_arg("path", temp_dir.path().to_str().unwrap())
            .with_arg("file_pattern", "*.rs");
        let result = execute_grep_search(&call);

        assert!(result.is_success());
        let output = result.output().unwrap();
        assert!(output.contains("a.rs"));
        assert!(!output.contains("b.txt"));
    }

    #[test]
    fn test_grep_search_invalid_regex() {
        let temp_file = NamedTempFile::new().unwrap();

        let call = ToolCall::new(GREP_SEARCH)
            .with_arg("pattern", "[invalid")
            .with_arg("path", temp_file.path().to_str().unwrap());
        let result = execute_grep_search(&call);

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }
}
