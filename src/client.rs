//! JSON-RPC probe client and timing measurements


use crate::{
    error::{AppError, ProbeError, Result},
    models::{EndpointDescriptor, ProbeOutcome},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// Probe trait for abstraction and testing
///
/// Implementations never fail: every error is folded into
/// [`ProbeOutcome::Failure`].
#[async_trait]
pub trait Prober: Send + Sync {
    /// Execute one timed request/response cycle against an endpoint
    async fn probe(&self, endpoint: &EndpointDescriptor) -> ProbeOutcome;
}

/// JSON-RPC request envelope sent by every probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: String,
    pub method: String,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: crate::defaults::JSONRPC_VERSION.to_string(),
            id: crate::defaults::JSONRPC_REQUEST_ID.to_string(),
            method: method.into(),
        }
    }
}

impl Default for RpcRequest {
    fn default() -> Self {
        Self::new(crate::defaults::DEFAULT_RPC_METHOD)
    }
}

/// JSON-RPC reply; any JSON object decodes, all fields are optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<serde_json::Value>,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// Probe client configuration
#[derive(Debug, Clone)]
pub struct ProbeClientConfig {
    pub timeout: Duration,
    pub method: String,
    pub user_agent: String,
}

impl Default for ProbeClientConfig {
    fn default() -> Self {
        Self {
            timeout: crate::defaults::DEFAULT_PROBE_TIMEOUT,
            method: crate::defaults::DEFAULT_RPC_METHOD.to_string(),
            user_agent: concat!("rpc-latency-bench/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ProbeClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }
}

/// Prober speaking JSON-RPC over HTTP POST
pub struct RpcProbeClient {
    client: Client,
    config: ProbeClientConfig,
    envelope: RpcRequest,
}

impl RpcProbeClient {
    /// Create a new probe client
    pub fn new(config: ProbeClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {}", e)))?;

        let envelope = RpcRequest::new(config.method.clone());

        Ok(Self {
            client,
            config,
            envelope,
        })
    }

    /// Create a probe client with the default envelope and a custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::new(ProbeClientConfig::default().with_timeout(timeout))
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    pub fn envelope(&self) -> &RpcRequest {
        &self.envelope
    }

    /// Send the envelope and decode the reply
    async fn exchange(&self, target: &str) -> std::result::Result<RpcResponse, ProbeError> {
        let response = self
            .client
            .post(target)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(&self.envelope)
            .send()
            .await?;

        // HTTP status is not checked; only the body decides success
        let body = response.bytes().await?;
        decode_reply(&body)
    }

    /// Timed exchange under the probe deadline
    pub async fn timed_exchange(
        &self,
        target: &str,
    ) -> std::result::Result<(Duration, RpcResponse), ProbeError> {
        let start = Instant::now();
        let reply = timeout(self.config.timeout, self.exchange(target))
            .await
            .map_err(|_| ProbeError::Timeout)??;
        Ok((start.elapsed(), reply))
    }
}

#[async_trait]
impl Prober for RpcProbeClient {
    async fn probe(&self, endpoint: &EndpointDescriptor) -> ProbeOutcome {
        match self.timed_exchange(&endpoint.target).await {
            Ok((elapsed, reply)) => ProbeOutcome::success_with_result(duration_ms(elapsed), reply.result),
            Err(e) => ProbeOutcome::failure(e.cause()),
        }
    }
}

/// Decode a reply body; anything but a JSON object is rejected
pub fn decode_reply(body: &[u8]) -> std::result::Result<RpcResponse, ProbeError> {
    let object: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(body).map_err(|e| ProbeError::Decode(e.to_string()))?;
    serde_json::from_value(serde_json::Value::Object(object)).map_err(|e| ProbeError::Decode(e.to_string()))
}

/// Duration as fractional milliseconds
pub fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
