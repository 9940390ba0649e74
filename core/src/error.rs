//! Error types for the request pipeline.
//!
//! # Design
//! The three failure families callers branch on are disjoint variants of
//! [`ApiError`]: the server explicitly rejected the call (`Protocol`), the
//! call never completed (`Transport`), or a payload failed schema
//! conformance on its way in or out (`Validation`). A 200 envelope with a
//! malformed body is a `Validation` failure, never a success and never a
//! `Protocol` failure. `Encode` covers request payloads that cannot be
//! serialized before a descriptor exists.

use thiserror::Error;

/// A single validation finding: where in the payload, and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Location within the payload (`"$"` for the root).
    pub path: String,
    pub message: String,
}

/// A payload failed schema conformance.
///
/// Carries the findings in the order they were produced; there is always at
/// least one.
#[derive(Debug, Clone, Error)]
#[error("payload failed validation ({} issue(s))", .issues.len())]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Shorthand for the common single-finding case.
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![Issue {
                path: path.into(),
                message: message.into(),
            }],
        }
    }
}

/// The underlying call could not complete.
///
/// Covers connection failures, request execution errors, and HTTP-level
/// non-2xx statuses observed before any envelope inspection.
#[derive(Debug, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Uniform error surface of the request pipeline.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server signaled failure through the response envelope.
    #[error("server rejected the request (code {code}): {message}")]
    Protocol { code: i64, message: String },

    /// The call never produced an interpretable response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An outbound or inbound payload failed schema conformance.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request payload could not be encoded into wire form.
    #[error("request payload could not be encoded: {0}")]
    Encode(String),
}
