//! Wire frames for the daemon's streaming turn endpoint
//!
//! The daemon streams one JSON object per line. Each line is classified
//! into a [`StreamEvent`] by [`parse_frame`], a pure function called once
//! per line in the gateway's background reader loop. Tool-call frames
//! arrive fully assembled; there is no partial-arguments state to track.

use serde::Deserialize;
use std::collections::HashMap;
use weave_domain::{StreamEvent, ToolCall};

/// One frame on the wire, tagged by `type`
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireFrame {
    /// Incremental assistant text
    Delta { text: String },
    /// Fully assembled tool-call request
    ToolCall {
        tool: String,
        #[serde(default)]
        arguments: HashMap<String, serde_json::Value>,
    },
    /// The turn finished normally
    Done,
    /// The daemon reports a provider-side failure
    Error { message: String },
}

/// Parse one line into a stream event.
///
/// Returns `None` for blank lines and for frames this client does not
/// understand; unknown frame types are skipped rather than failing the
/// stream, so daemon-side additions stay backward compatible.
pub fn parse_frame(line: &str) -> Option<StreamEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let frame: WireFrame = serde_json::from_str(line).ok()?;
    Some(match frame {
        WireFrame::Delta { text } => StreamEvent::Delta(text),
        WireFrame::ToolCall { tool, arguments } => StreamEvent::ToolCallRequest(ToolCall {
            tool_name: tool,
            arguments,
        }),
        WireFrame::Done => StreamEvent::Completed,
        WireFrame::Error { message } => StreamEvent::Error(message),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delta() {
        let event = parse_frame(r#"{"type":"delta","text":"hel"}"#).unwrap();
        assert!(matches!(event, StreamEvent::Delta(t) if t == "hel"));
    }

    #[test]
    fn parse_tool_call() {
        let event = parse_frame(
            r#"{"type":"tool_call","tool":"read_file","arguments":{"path":"/tmp/x"}}"#,
        )
        .unwrap();
        let StreamEvent::ToolCallRequest(call) = event else {
            panic!("expected tool call");
        };
        assert_eq!(call.tool_name, "read_file");
        assert_eq!(call.get_string("path"), Some("/tmp/x"));
    }

    #[test]
    fn parse_tool_call_without_arguments() {
        let event = parse_frame(r#"{"type":"tool_call","tool":"list_dir"}"#).unwrap();
        let StreamEvent::ToolCallRequest(call) = event else {
            panic!("expected tool call");
        };
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn parse_done_and_error() {
        assert!(matches!(
            parse_frame(r#"{"type":"done"}"#),
            Some(StreamEvent::Completed)
        ));
        assert!(matches!(
            parse_frame(r#"{"type":"error","message":"overloaded"}"#),
            Some(StreamEvent::Error(m)) if m == "overloaded"
        ));
    }

    #[test]
    fn blank_and_unknown_lines_are_skipped() {
        assert!(parse_frame("").is_none());
        assert!(parse_frame("   ").is_none());
        assert!(parse_frame(r#"{"type":"heartbeat"}"#).is_none());
        assert!(parse_frame("not json").is_none());
    }
}
