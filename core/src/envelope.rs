//! Interpretation of the server's response envelope.
//!
//! # Design
//! Every response body is expected to be an envelope object
//! `{code, data, message, timestamp}` owned by the server; the client only
//! reads it. Code 200 (or an absent code) signals success; any other value
//! signals failure, and `data` is then never surfaced as a success payload.
//! This module is the single success/failure boundary — every verb wrapper
//! routes its transport result through [`ResponseEnvelope::into_payload`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ValidationError};

/// Envelope code signaling success.
pub const SUCCESS_CODE: i64 = 200;

/// Structured wrapper the server puts around every response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ResponseEnvelope {
    /// Parse a decoded response body into an envelope.
    ///
    /// The server owns this shape, so failure to conform is a validation
    /// failure at the trust boundary, not a protocol failure.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        serde_json::from_value(value)
            .map_err(|e| ValidationError::single("$", format!("malformed response envelope: {e}")))
    }

    /// Unwrap the envelope into its payload.
    ///
    /// Code 500 is logged before failing; every other non-200 code fails
    /// silently. Successful envelopes without a `data` field yield `true`,
    /// for endpoints that signal success with no payload.
    pub fn into_payload(self) -> Result<Value, ApiError> {
        match self.code {
            Some(code) if code == 500 => {
                let message = self.message.unwrap_or_default();
                tracing::error!(code, message = %message, "server reported internal failure");
                Err(ApiError::Protocol { code, message })
            }
            Some(code) if code != SUCCESS_CODE => Err(ApiError::Protocol {
                code,
                message: self.message.unwrap_or_default(),
            }),
            _ => Ok(self.data.unwrap_or(Value::Bool(true))),
        }
    }
}
