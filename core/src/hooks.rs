//! Observer hooks fired around every transport round-trip.
//!
//! # Design
//! Hooks are a capability interface: each method is independently optional
//! (default no-op) and strictly observational. A hook never converts a
//! failure into a success or vice versa, and the pipeline does not catch
//! panics raised inside one — they propagate as-is. The only mutation
//! allowed is [`Hooks::on_request_prepare`] returning a replacement
//! descriptor for the outbound request.

use crate::error::ApiError;
use crate::http::{RequestDescriptor, WireResponse};

/// Observation points of the request pipeline.
///
/// For a given call the methods fire in a strict order: `on_request_prepare`
/// before the request is sent, `on_response_observed` after a response or
/// failure is received, `on_error` only on failure paths. There is no
/// cross-call ordering guarantee between concurrent requests.
pub trait Hooks: Send + Sync {
    /// Invoked with the outbound descriptor before dispatch; returning
    /// `Some` substitutes the descriptor. Invoked with `None` when
    /// descriptor construction itself failed.
    fn on_request_prepare(&self, request: Option<&RequestDescriptor>) -> Option<RequestDescriptor> {
        let _ = request;
        None
    }

    /// Invoked with the response after a successful round-trip, or with
    /// `None` on failure. The return value is discarded.
    fn on_response_observed(&self, response: Option<&WireResponse>) {
        let _ = response;
    }

    /// Invoked with the failure before it is re-signaled to the caller.
    fn on_error(&self, error: &ApiError) {
        let _ = error;
    }
}

/// Hook set that observes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl Hooks for NoopHooks {}
