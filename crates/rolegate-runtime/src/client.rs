//! Transports carrying JSON-RPC to resource servers.

use crate::error::ClientError;
use async_trait::async_trait;
use rolegate_core::{ResourceServerDescriptor, TransportKind};
use rolegate_mcp::{JsonRpcRequest, JsonRpcResponse};
use std::time::Duration;

/// Sends one JSON-RPC request to a resource server with a bearer token.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    async fn send(
        &self,
        server: &ResourceServerDescriptor,
        token: &str,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, ClientError>;
}

/// Per-request timeout of [`HttpTransport::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC over HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Transport with [`DEFAULT_TIMEOUT`] on every request.
    pub fn new() -> Self {
        match Self::with_timeout(DEFAULT_TIMEOUT) {
            Ok(transport) => transport,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build HTTP client; using per-request timeout");
                Self {
                    client: reqwest::Client::new(),
                    timeout: Some(DEFAULT_TIMEOUT),
                }
            }
        }
    }

    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            timeout: Some(timeout),
        })
    }

    /// Use a caller-built client as is.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolTransport for HttpTransport {
    async fn send(
        &self,
        server: &ResourceServerDescriptor,
        token: &str,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, ClientError> {
        let transport_error = |message: String| ClientError::Transport {
            server: server.id,
            message,
        };
        if server.transport != TransportKind::Http {
            return Err(transport_error(format!(
                "unsupported transport '{}'",
                server.transport
            )));
        }

        let mut builder = self
            .client
            .post(&server.address)
            .bearer_auth(token)
            .json(&request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let resp = builder
            .send()
            .await
            .map_err(|e| transport_error(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| transport_error(e.to_string()))?;

        // Gateway rejections arrive as 401/403 with a JSON-RPC error body.
        match serde_json::from_str::<JsonRpcResponse>(&body) {
            Ok(response) => Ok(response),
            Err(_) if !status.is_success() => Err(ClientError::Protocol {
                server: server.id,
                message: format!("HTTP {}: {}", status, body),
            }),
            Err(e) => Err(ClientError::Protocol {
                server: server.id,
                message: e.to_string(),
            }),
        }
    }
}
