//! JSONL file writer for permission decision records
//!
//! Every [`DecisionRecord`] becomes one JSON line with a `kind`, an RFC 3339
//! `timestamp`, the `tool` when there is one, and a `detail` string.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use weave_application::{DecisionLog, DecisionRecord};

/// JSONL decision logger that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record so
/// the log survives a crash mid-session.
pub struct JsonlDecisionLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlDecisionLog {
    /// Create a logger appending to the given path.
    ///
    /// Creates the file and parent directories if missing. Returns `None`
    /// if the file cannot be opened; decision logging is best-effort and
    /// must never take the session down.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create decision log directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open decision log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DecisionLog for JsonlDecisionLog {
    fn record(&self, record: DecisionRecord) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let Ok(serde_json::Value::Object(mut map)) = serde_json::to_value(&record) else {
            return;
        };
        map.insert(
            "timestamp".to_string(),
            serde_json::Value::String(timestamp),
        );

        let Ok(line) = serde_json::to_string(&serde_json::Value::Object(map)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlDecisionLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_application::DecisionKind;

    #[test]
    fn test_records_are_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        let log = JsonlDecisionLog::new(&path).unwrap();

        log.record(DecisionRecord::for_tool(
            DecisionKind::ApprovedOnce,
            "write_file",
            "path=/tmp/a.txt",
        ));
        log.record(DecisionRecord::new(DecisionKind::Cancelled, "user interrupt"));
        drop(log);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["kind"], "approved-once");
        assert_eq!(first["tool"], "write_file");
        assert!(first.get("timestamp").is_some());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["kind"], "cancelled");
        // No tool field when the record is not tool-specific
        assert!(second.get("tool").is_none());
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");

        {
            let log = JsonlDecisionLog::new(&path).unwrap();
            log.record(DecisionRecord::new(DecisionKind::PermissionReset, "first"));
        }
        {
            let log = JsonlDecisionLog::new(&path).unwrap();
            log.record(DecisionRecord::new(DecisionKind::PermissionReset, "second"));
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim().lines().count(), 2);
    }
}
