//! HTTP adapter for the mesh daemon's model API
//!
//! One turn is one `POST /v1/turn` carrying the whole transcript; the
//! daemon answers with a JSON-lines stream that a background reader task
//! forwards into the [`StreamHandle`] channel, frame by frame. Pairing is
//! a plain `POST /v1/pair` exchange.

use super::wire;
use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use weave_application::{GatewayError, ModelGateway, StreamHandle};
use weave_domain::{StreamEvent, Transcript};

/// Channel capacity for the stream event pipe
const STREAM_CHANNEL_SIZE: usize = 64;

/// Timeout for the non-streaming pairing exchange
const PAIR_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct PairResponse {
    peer: String,
}

/// Gateway talking to the local mesh daemon over HTTP
pub struct DaemonModelGateway {
    client: reqwest::Client,
    base_url: String,
}

impl DaemonModelGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ModelGateway for DaemonModelGateway {
    async fn start_turn(
        &self,
        transcript: &Transcript,
        cancel: CancellationToken,
    ) -> Result<StreamHandle, GatewayError> {
        let response = self
            .client
            .post(self.endpoint("/v1/turn"))
            .json(&json!({ "transcript": transcript }))
            .send()
            .await
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "daemon returned {}: {}",
                status.as_u16(),
                detail
            )));
        }

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_SIZE);
        tokio::spawn(async move {
            let mut body = response.bytes_stream();
            let mut buffer = String::new();

            loop {
                let chunk = tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("turn cancelled, dropping stream");
                        return;
                    }
                    chunk = body.next() => chunk,
                };

                let bytes = match chunk {
                    Some(Ok(b)) => b,
                    Some(Err(e)) => {
                        warn!("daemon stream error: {}", e);
                        let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                        return;
                    }
                    // Body ended; a well-behaved daemon sent `done` already
                    None => return,
                };

                buffer.push_str(&String::from_utf8_lossy(&bytes));
                while let Some(pos) = buffer.find('\n') {
                    let line: String = buffer.drain(..=pos).collect();
                    if let Some(event) = wire::parse_frame(&line) {
                        let terminal = event.is_terminal();
                        if tx.send(event).await.is_err() || terminal {
                            return;
                        }
                    }
                }
            }
        });

        Ok(StreamHandle::new(rx))
    }

    async fn pair(&self, code: &str) -> Result<String, GatewayError> {
        let response = self
            .client
            .post(self.endpoint("/v1/pair"))
            .timeout(PAIR_TIMEOUT)
            .json(&json!({ "code": code }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::PairingRejected(format!(
                "{}: {}",
                status.as_u16(),
                detail
            )));
        }

        let parsed: PairResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;
        Ok(parsed.peer)
    }
}
