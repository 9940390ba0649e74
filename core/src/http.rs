//! Wire-level request and response types.
//!
//! # Design
//! These types describe HTTP traffic as plain data. The pipeline builds a
//! `RequestDescriptor`, hands it to a [`crate::transport::Transport`], and
//! gets back a `WireResponse` — nothing in this module touches the network.
//! A descriptor is immutable once handed to the transport; each logical call
//! constructs its own.
//!
//! All fields use owned types (`String`, `Vec`) so descriptors can be moved
//! across task boundaries without lifetime concerns.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Correlation identifier for one logical request.
///
/// Generated fresh for every descriptor and propagated through log lines and
/// observer hooks, so all activity for a single call can be tied together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a new random request identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a [`RequestId`] from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An outbound HTTP request described as plain data.
///
/// Built by the request pipeline after configuration merging and body
/// encoding. The transport executes it verbatim.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub id: RequestId,
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Encoded wire body, if the call carries one.
    pub body: Option<String>,
    /// Whether credentials (cookies) travel with the request. Always set by
    /// the resolver; transports that cannot honor it must document so.
    pub with_credentials: bool,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing a [`RequestDescriptor`],
/// then fed through the decode pipeline and envelope interpretation.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Set `name` in `headers`, replacing an existing entry regardless of case.
pub fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: impl Into<String>) {
    let value = value.into();
    for entry in headers.iter_mut() {
        if entry.0.eq_ignore_ascii_case(name) {
            entry.1 = value;
            return;
        }
    }
    headers.push((name.to_string(), value));
}

/// Set `name` in `headers` only when no entry with that name exists yet.
pub fn ensure_header(headers: &mut Vec<(String, String)>, name: &str, value: impl Into<String>) {
    if !headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)) {
        headers.push((name.to_string(), value.into()));
    }
}

/// Look up a header value by case-insensitive name.
pub fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
