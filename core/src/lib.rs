//! Typed, validated request layer for envelope-speaking HTTP APIs.
//!
//! # Overview
//! Composes URL resolution, configuration injection, body encode/decode,
//! response-envelope unwrapping, and schema validation into one pipeline
//! behind [`ApiClient`]. The transport is pluggable: production calls go
//! through reqwest, tests swap in scripted transports.
//!
//! # Design
//! - One explicit [`ApiConfig`] per client; no global mutable state.
//! - Requests and responses are plain data (`RequestDescriptor` /
//!   `WireResponse`); the transport boundary is a trait, so the pipeline
//!   stays deterministic and testable without a network.
//! - Server payloads cross a trust boundary: the envelope, and optionally a
//!   per-call [`Schema`], validate them before application code sees typed
//!   data.
//! - Failures are disjoint: the server rejected the call ([`ApiError::Protocol`]),
//!   the call never completed ([`ApiError::Transport`]), or a payload failed
//!   conformance ([`ApiError::Validation`]).

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod hooks;
pub mod http;
pub mod schema;
pub mod transform;
pub mod transport;

pub use client::ApiClient;
pub use config::{ApiConfig, ApiConfigBuilder, CallOptions, ENCRYPTED_HEADER};
pub use envelope::ResponseEnvelope;
pub use error::{ApiError, Issue, TransportError, ValidationError};
pub use gateway::Gateway;
pub use hooks::{Hooks, NoopHooks};
pub use http::{HttpMethod, RequestDescriptor, RequestId, WireResponse};
pub use schema::{Schema, TypedSchema};
pub use transform::{BodyCodec, JsonCodec, TransformStage};
pub use transport::{ReqwestTransport, Transport};
