//! Body serialization pipeline: codecs and ordered transform stages.
//!
//! # Design
//! A [`BodyCodec`] turns a structured payload into wire text and back; the
//! default [`JsonCodec`] speaks plain JSON. Configuration-level
//! [`TransformStage`] lists run in order around the codec (request stages
//! before encode, response stages after decode). A per-call codec replaces
//! both the default codec and the configured stages — the most specific
//! pipeline wins — and is signaled to the server via the `X-ENCRYPTED`
//! header computed by the config resolver.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::ensure_header;

/// Paired encode/decode functions applied to request and response bodies.
///
/// `encode` may append headers describing the wire format it produced.
/// `decode` must be idempotent: already-structured values pass through
/// unchanged, so decoding twice equals decoding once.
pub trait BodyCodec: Send + Sync {
    fn encode(
        &self,
        value: &Value,
        headers: &mut Vec<(String, String)>,
    ) -> Result<String, ApiError>;

    fn decode(&self, wire: &Value) -> Result<Value, ApiError>;
}

/// Default codec: JSON text with a `Content-Type: application/json` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl BodyCodec for JsonCodec {
    fn encode(
        &self,
        value: &Value,
        headers: &mut Vec<(String, String)>,
    ) -> Result<String, ApiError> {
        ensure_header(headers, "Content-Type", "application/json");
        serde_json::to_string(value).map_err(|e| ApiError::Encode(e.to_string()))
    }

    /// Parse raw text into a structured value; pass everything else through.
    ///
    /// Text that is not valid JSON is also passed through unchanged, so the
    /// envelope parser is the one to report it.
    fn decode(&self, wire: &Value) -> Result<Value, ApiError> {
        match wire {
            Value::String(raw) => Ok(serde_json::from_str(raw).unwrap_or_else(|_| wire.clone())),
            other => Ok(other.clone()),
        }
    }
}

/// One step of a configuration-level transform list.
pub trait TransformStage: Send + Sync {
    fn apply(&self, value: Value) -> Result<Value, ApiError>;
}

impl<F> TransformStage for F
where
    F: Fn(Value) -> Result<Value, ApiError> + Send + Sync,
{
    fn apply(&self, value: Value) -> Result<Value, ApiError> {
        self(value)
    }
}

/// Run `value` through `stages` in order.
pub fn apply_stages(
    stages: &[std::sync::Arc<dyn TransformStage>],
    mut value: Value,
) -> Result<Value, ApiError> {
    for stage in stages {
        value = stage.apply(value)?;
    }
    Ok(value)
}
