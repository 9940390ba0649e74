//! The gateway: one shared transport plus the observer-hook chain.
//!
//! # Design
//! `Gateway` enforces the hook ordering contract for a single round-trip:
//! the prepare hook runs before dispatch (and may substitute the
//! descriptor), the response hook runs after a response or failure arrives,
//! and the error hook runs only on failure paths — always before the
//! failure is re-signaled, never instead of it. Hooks cannot turn a failure
//! into a success; their own panics propagate untouched.

use std::sync::Arc;

use crate::error::{ApiError, TransportError};
use crate::hooks::Hooks;
use crate::http::{RequestDescriptor, WireResponse};
use crate::transport::Transport;

pub struct Gateway {
    transport: Arc<dyn Transport>,
    hooks: Arc<dyn Hooks>,
}

impl Gateway {
    pub fn new(transport: Arc<dyn Transport>, hooks: Arc<dyn Hooks>) -> Self {
        Self { transport, hooks }
    }

    /// Execute one round-trip with hook observation.
    ///
    /// HTTP-level non-2xx statuses fail here as transport errors; envelope
    /// interpretation only ever sees 2xx responses.
    pub async fn send(&self, request: RequestDescriptor) -> Result<WireResponse, ApiError> {
        let request = match self.hooks.on_request_prepare(Some(&request)) {
            Some(replacement) => replacement,
            None => request,
        };

        let id = request.id;
        tracing::debug!(
            request_id = %id,
            method = request.method.as_str(),
            url = %request.url,
            "dispatching request"
        );

        match self.transport.execute(request).await {
            Ok(response) if (200..300).contains(&response.status) => {
                tracing::debug!(request_id = %id, status = response.status, "response received");
                self.hooks.on_response_observed(Some(&response));
                Ok(response)
            }
            Ok(response) => {
                self.hooks.on_response_observed(None);
                let err = ApiError::Transport(TransportError::new(format!(
                    "server responded with HTTP {}",
                    response.status
                )));
                self.hooks.on_error(&err);
                Err(err)
            }
            Err(err) => {
                self.hooks.on_response_observed(None);
                let err = ApiError::Transport(err);
                self.hooks.on_error(&err);
                Err(err)
            }
        }
    }

    /// Report a request that failed before a descriptor existed.
    ///
    /// Mirrors the failure leg of the outbound hook: the prepare hook fires
    /// with no descriptor, then the error hook, and the caller re-signals.
    pub fn report_prepare_failure(&self, error: &ApiError) {
        self.hooks.on_request_prepare(None);
        self.hooks.on_error(error);
    }
}
