//! JSON-RPC over HTTP
//!
//! Provider for a node that manages its own accounts (a local dev node, or a
//! node with unlocked keys). Signing happens on the node.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

use super::{Provider, RpcErrorObject};
use crate::diary::{DiaryError, DiaryResult};

/// JSON-RPC 2.0 client over HTTP
#[derive(Clone)]
pub struct HttpProvider {
    client: Client,
    url: Arc<str>,
    next_id: Arc<AtomicU64>,
}

impl HttpProvider {
    /// Create a provider for `url` with a per-request timeout
    pub fn new(url: &str, request_timeout: Duration) -> DiaryResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| DiaryError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: Arc::from(url.trim_end_matches('/')),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

impl RpcResponse {
    fn into_result(self) -> DiaryResult<Value> {
        match self.error {
            Some(error) => Err(error.into()),
            // A missing result is a legitimate `null` (e.g. a pending receipt)
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

fn transport_error(e: reqwest::Error) -> DiaryError {
    if e.is_timeout() {
        DiaryError::Transport("request timed out".to_string())
    } else if e.is_connect() {
        DiaryError::Transport(format!("node unavailable: {}", e))
    } else {
        DiaryError::Transport(e.to_string())
    }
}

#[async_trait(?Send)]
impl Provider for HttpProvider {
    async fn request(&self, method: &str, params: Value) -> DiaryResult<Value> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        trace!(id = body.id, method, "JSON-RPC request");

        let response = self
            .client
            .post(&*self.url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DiaryError::Transport(format!("HTTP {}: {}", status, text)));
        }

        let reply: RpcResponse = response.json().await.map_err(transport_error)?;
        reply.into_result()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
