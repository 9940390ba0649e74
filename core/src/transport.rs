//! Transport abstraction and the reqwest-backed implementation.
//!
//! # Design
//! [`Transport`] executes one [`RequestDescriptor`] and reports every HTTP
//! status as data — the pipeline, not the transport, owns status
//! interpretation. One shared instance serves all in-flight calls; a call
//! never holds transport state of its own. Timeouts and cancellation are
//! the transport's concern and must be honored by any substitute used in
//! tests.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::http::{HttpMethod, RequestDescriptor, WireResponse};

/// Executes HTTP round-trips for the request pipeline.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `request` and return the raw response.
    ///
    /// Non-2xx statuses are returned as a [`WireResponse`], not an error;
    /// `Err` means the call itself could not complete.
    async fn execute(&self, request: RequestDescriptor) -> Result<WireResponse, TransportError>;
}

/// Production transport backed by a shared [`reqwest::Client`].
///
/// The client carries a cookie store, so credentials travel with every
/// request as the descriptor's `with_credentials` flag demands.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| TransportError::with_source("failed to construct HTTP client", e))?;
        Ok(Self { client })
    }

    /// Wrap an existing client (custom TLS, proxies, timeouts).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: RequestDescriptor) -> Result<WireResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::with_source(format!("request to {} failed", request.url), e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::with_source("failed to read response body", e))?;

        Ok(WireResponse {
            status,
            headers,
            body,
        })
    }
}
