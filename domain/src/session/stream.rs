//! Streaming events for one model response
//!
//! [`StreamEvent`] is the unit the model-provider gateway delivers to the
//! session controller: incremental text, whole tool-call requests, and a
//! terminal completion or error. Partial tool-call fragments are a gateway
//! concern; by the time an event reaches the controller the call is fully
//! assembled.

use crate::tool::entities::ToolCall;

/// An event in a streaming model response.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A text chunk from the model
    Delta(String),
    /// A fully assembled tool-call request interleaved in the stream
    ToolCallRequest(ToolCall),
    /// The model signalled end of this response turn
    Completed,
    /// An error that occurred during streaming
    Error(String),
}

impl StreamEvent {
    /// Returns the text content if this is a Delta event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed | StreamEvent::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_text_returns_content() {
        let event = StreamEvent::Delta("hello".to_string());
        assert_eq!(event.text(), Some("hello"));
        assert!(!event.is_terminal());
    }

    #[test]
    fn tool_call_request_is_not_terminal() {
        let event = StreamEvent::ToolCallRequest(ToolCall::new("read_file"));
        assert!(!event.is_terminal());
        assert_eq!(event.text(), None);
    }

    #[test]
    fn completed_and_error_are_terminal() {
        assert!(StreamEvent::Completed.is_terminal());
        assert!(StreamEvent::Error("oops".to_string()).is_terminal());
    }
}
