//! Model gateway port
//!
//! Defines the interface for communicating with the model provider (the
//! mesh daemon). One call to [`ModelGateway::start_turn`] yields a
//! [`StreamHandle`] delivering incremental output and fully assembled
//! tool-call requests; the controller replays the transcript, so the same
//! method serves both the initial turn and tool-result continuation turns.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use weave_domain::{StreamEvent, Transcript};

/// Errors that can occur during gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Pairing rejected: {0}")]
    PairingRejected(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Transport closed")]
    TransportClosed,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for model communication
///
/// This port defines how the application layer talks to the model provider.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Start streaming one model turn for the given transcript.
    ///
    /// The transcript carries tool results from the current round, so a
    /// continuation turn after tool execution is just another `start_turn`.
    /// The gateway must stop producing events promptly once `cancel` fires.
    async fn start_turn(
        &self,
        transcript: &Transcript,
        cancel: CancellationToken,
    ) -> Result<StreamHandle, GatewayError>;

    /// Exchange a pairing code with the daemon; returns the peer name.
    async fn pair(&self, code: &str) -> Result<String, GatewayError>;
}

/// Handle for receiving streaming events from one model turn.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`; the gateway's reader task owns
/// the sender and posts each event exactly once.
pub struct StreamHandle {
    receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Take the underlying receiver for use in a select loop.
    pub fn into_receiver(self) -> mpsc::Receiver<StreamEvent> {
        self.receiver
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed => return Ok(full_text),
                StreamEvent::Error(e) => return Err(GatewayError::RequestFailed(e)),
                StreamEvent::ToolCallRequest(_) => {}
            }
        }
        Err(GatewayError::TransportClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collect_text_joins_deltas() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Delta("hel".into())).await.unwrap();
        tx.send(StreamEvent::Delta("lo".into())).await.unwrap();
        tx.send(StreamEvent::Completed).await.unwrap();

        let handle = StreamHandle::new(rx);
        assert_eq!(handle.collect_text().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn collect_text_surfaces_stream_error() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Error("boom".into())).await.unwrap();

        let handle = StreamHandle::new(rx);
        assert!(matches!(
            handle.collect_text().await,
            Err(GatewayError::RequestFailed(_))
        ));
    }

    #[tokio::test]
    async fn collect_text_reports_closed_transport() {
        let (tx, rx) = mpsc::channel::<StreamEvent>(1);
        drop(tx);

        let handle = StreamHandle::new(rx);
        assert!(matches!(
            handle.collect_text().await,
            Err(GatewayError::TransportClosed)
        ));
    }
}
