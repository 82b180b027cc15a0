//! Execution of `HttpRequest` values.
//!
//! `Transport` is the seam between the sans-IO client and the network.
//! `UreqTransport` runs the blocking ureq agent on tokio's blocking pool so
//! the async callers above it never stall a runtime worker.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one round-trip. Any status code counts as a response; only a
    /// failed exchange is an error.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        // Status codes are data here; `AmphibiansClient` interprets them.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| TransportError::Worker(e.to_string()))?
    }
}

fn execute_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let HttpRequest {
        method,
        path,
        headers,
        ..
    } = request;
    tracing::debug!(method = method.as_str(), %path, "sending request");

    let mut builder = match method {
        HttpMethod::Get => agent.get(&path),
    };
    for (key, value) in &headers {
        builder = builder.header(key.as_str(), value.as_str());
    }

    let mut response = builder.call().map_err(transport_error)?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
        .collect();
    let body = response.body_mut().read_to_string().map_err(transport_error)?;

    tracing::debug!(%path, status, bytes = body.len(), "received response");
    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn transport_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        other => TransportError::Io(other.to_string()),
    }
}
