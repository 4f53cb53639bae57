//! Network tools: web_fetch, mesh_send, mesh_query
//!
//! The mesh tools route through the local daemon's HTTP API; `web_fetch`
//! talks to the target URL directly. All three share one `reqwest::Client`.

use serde_json::json;
use std::time::{Duration, Instant};
use weave_domain::{ToolCall, ToolCategory, ToolDefinition, ToolError, ToolParameter, ToolResult};

/// Tool name constants
pub const WEB_FETCH: &str = "web_fetch";
pub const MESH_SEND: &str = "mesh_send";
pub const MESH_QUERY: &str = "mesh_query";

/// Maximum response body size (5 MB)
const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

/// Default max output text size (50 KB)
const DEFAULT_MAX_TEXT: usize = 50 * 1024;

/// Request timeout for all network tools
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn web_fetch_definition() -> ToolDefinition {
    ToolDefinition::new(
        WEB_FETCH,
        "Fetch a URL and return the response body as text",
        ToolCategory::Web,
        true,
    )
    .with_parameter(ToolParameter::new("url", "The URL to fetch", true))
    .with_parameter(
        ToolParameter::new(
            "max_length",
            "Maximum length of returned text in bytes (default: 51200)",
            false,
        )
        .with_type("number"),
    )
}

pub fn mesh_send_definition() -> ToolDefinition {
    ToolDefinition::new(
        MESH_SEND,
        "Send a message to a paired mesh peer via the local daemon",
        ToolCategory::MeshRpc,
        true,
    )
    .with_parameter(ToolParameter::new("peer", "Name of the paired peer", true))
    .with_parameter(ToolParameter::new("message", "Message text to deliver", true))
}

pub fn mesh_query_definition() -> ToolDefinition {
    ToolDefinition::new(
        MESH_QUERY,
        "Query a paired mesh peer and return its reply",
        ToolCategory::MeshRpc,
        false,
    )
    .with_parameter(ToolParameter::new("peer", "Name of the paired peer", true))
    .with_parameter(ToolParameter::new("query", "Query text", true))
}

/// Shared HTTP client for the network tools
#[derive(Clone)]
pub struct MeshClient {
    client: reqwest::Client,
    daemon_url: String,
}

impl MeshClient {
    pub fn new(daemon_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            daemon_url: daemon_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Execute the web_fetch tool
    pub async fn execute_web_fetch(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();

        let url = match call.require_string("url") {
            Ok(u) => u,
            Err(e) => return ToolResult::failure(WEB_FETCH, ToolError::invalid_argument(e)),
        };
        let max_length = call
            .get_i64("max_length")
            .map(|v| v as usize)
            .unwrap_or(DEFAULT_MAX_TEXT);

        let response = match self
            .client
            .get(url)
            .header("User-Agent", "weave/0.4 (tool)")
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                return ToolResult::failure(
                    WEB_FETCH,
                    ToolError::execution_failed(format!("Failed to fetch URL: {}", e)),
                );
            }
        };

        let status = response.status();
        if !status.is_success() {
            return ToolResult::failure(
                WEB_FETCH,
                ToolError::execution_failed(format!(
                    "HTTP error: {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )),
            );
        }

        let body = match response.bytes().await {
            Ok(b) if b.len() > MAX_BODY_SIZE => {
                return ToolResult::failure(
                    WEB_FETCH,
                    ToolError::execution_failed(format!(
                        "Response too large: {} bytes (max: {} bytes)",
                        b.len(),
                        MAX_BODY_SIZE
                    )),
                );
            }
            Ok(b) => b,
            Err(e) => {
                return ToolResult::failure(
                    WEB_FETCH,
                    ToolError::execution_failed(format!("Failed to read response body: {}", e)),
                );
            }
        };

        let text = String::from_utf8_lossy(&body);
        let output = if text.len() > max_length {
            let mut cut = max_length;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            format!(
                "{}\n\n[... truncated at {} bytes, total: {} bytes]",
                &text[..cut],
                max_length,
                text.len()
            )
        } else {
            text.to_string()
        };

        ToolResult::success(WEB_FETCH, output).with_duration(start.elapsed().as_millis() as u64)
    }

    /// Execute the mesh_send tool
    pub async fn execute_mesh_send(&self, call: &ToolCall) -> ToolResult {
        self.daemon_exchange(MESH_SEND, call, "message", "send").await
    }

    /// Execute the mesh_query tool
    pub async fn execute_mesh_query(&self, call: &ToolCall) -> ToolResult {
        self.daemon_exchange(MESH_QUERY, call, "query", "query").await
    }

    /// Shared POST exchange with the daemon's mesh endpoints
    async fn daemon_exchange(
        &self,
        tool: &str,
        call: &ToolCall,
        payload_key: &str,
        endpoint: &str,
    ) -> ToolResult {
        let start = Instant::now();

        let peer = match call.require_string("peer") {
            Ok(p) => p,
            Err(e) => return ToolResult::failure(tool, ToolError::invalid_argument(e)),
        };
        let payload = match call.require_string(payload_key) {
            Ok(m) => m,
            Err(e) => return ToolResult::failure(tool, ToolError::invalid_argument(e)),
        };

        let url = format!("{}/v1/mesh/{}", self.daemon_url, endpoint);
        let response = match self
            .client
            .post(&url)
            .json(&json!({ "peer": peer, payload_key: payload }))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                return ToolResult::failure(tool, ToolError::timeout(format!("{} to {}", tool, peer)));
            }
            Err(e) => {
                return ToolResult::failure(
                    tool,
                    ToolError::execution_failed(format!("Daemon request failed: {}", e)),
                );
            }
        };

        let status = response.status();
        if status.as_u16() == 404 {
            return ToolResult::failure(tool, ToolError::not_found(format!("peer '{}'", peer)));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return ToolResult::failure(
                tool,
                ToolError::execution_failed(format!("Daemon error {}: {}", status.as_u16(), detail)),
            );
        }

        let reply = match response.text().await {
            Ok(t) => t,
            Err(e) => {
                return ToolResult::failure(
                    tool,
                    ToolError::execution_failed(format!("Failed to read daemon reply: {}", e)),
                );
            }
        };

        ToolResult::success(tool, reply).with_duration(start.elapsed().as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_web_fetch_requires_url() {
        let client = MeshClient::new("http://127.0.0.1:7777");
        let result = client.execute_web_fetch(&ToolCall::new(WEB_FETCH)).await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_mesh_send_requires_peer_and_message() {
        let client = MeshClient::new("http://127.0.0.1:7777");

        let result = client.execute_mesh_send(&ToolCall::new(MESH_SEND)).await;
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");

        let result = client
            .execute_mesh_send(&ToolCall::new(MESH_SEND).with_arg("peer", "laptop"))
            .await;
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[test]
    fn test_daemon_url_is_normalized() {
        let client = MeshClient::new("http://localhost:7777/");
        assert_eq!(client.daemon_url, "http://localhost:7777");
    }
}
