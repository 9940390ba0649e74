//! Client configuration and per-call resolution.
//!
//! # Design
//! One explicit [`ApiConfig`] instance is built at startup and moved into an
//! [`crate::client::ApiClient`]; there is no process-wide singleton, and the
//! instance is immutable after construction. "Reconfiguring" means building
//! a new client, which also keeps tests isolated from each other.
//!
//! Per-call resolution merges, lowest to highest precedence: configured
//! transform lists, configured additional headers, caller-supplied headers,
//! the computed `X-ENCRYPTED` marker, and forced credentials inclusion.

use std::sync::Arc;

use crate::hooks::{Hooks, NoopHooks};
use crate::http::set_header;
use crate::transform::{BodyCodec, TransformStage};

/// Name of the header signaling a non-default body pipeline.
pub const ENCRYPTED_HEADER: &str = "X-ENCRYPTED";

/// Process-level configuration for one [`crate::client::ApiClient`].
#[derive(Clone)]
pub struct ApiConfig {
    root_path: String,
    additional_headers: Vec<(String, String)>,
    request_transforms: Vec<Arc<dyn TransformStage>>,
    response_transforms: Vec<Arc<dyn TransformStage>>,
    hooks: Arc<dyn Hooks>,
}

impl ApiConfig {
    /// Start building a configuration rooted at `root_path`.
    pub fn builder(root_path: impl Into<String>) -> ApiConfigBuilder {
        ApiConfigBuilder {
            root_path: root_path.into(),
            additional_headers: Vec::new(),
            request_transforms: Vec::new(),
            response_transforms: Vec::new(),
            hooks: Arc::new(NoopHooks),
        }
    }

    /// Concatenate the root path and `path` with exactly one separating
    /// slash, regardless of how either side spells its edges.
    pub fn resolve_url(&self, path: &str) -> String {
        format!("{}/{}", self.root_path, path.trim_start_matches('/'))
    }

    /// Merge this configuration with one call's options.
    pub fn resolve_call(&self, options: &CallOptions) -> ResolvedCall {
        let mut headers = self.additional_headers.clone();
        for (name, value) in &options.headers {
            set_header(&mut headers, name, value.clone());
        }
        // The computed marker outranks anything the caller set by hand.
        let piped = !self.request_transforms.is_empty() || options.codec.is_some();
        set_header(&mut headers, ENCRYPTED_HEADER, if piped { "yes" } else { "no" });

        ResolvedCall {
            headers,
            codec_override: options.codec.clone(),
            with_credentials: true,
        }
    }

    pub fn request_transforms(&self) -> &[Arc<dyn TransformStage>] {
        &self.request_transforms
    }

    pub fn response_transforms(&self) -> &[Arc<dyn TransformStage>] {
        &self.response_transforms
    }

    pub fn hooks(&self) -> Arc<dyn Hooks> {
        Arc::clone(&self.hooks)
    }
}

/// Builder for [`ApiConfig`].
pub struct ApiConfigBuilder {
    root_path: String,
    additional_headers: Vec<(String, String)>,
    request_transforms: Vec<Arc<dyn TransformStage>>,
    response_transforms: Vec<Arc<dyn TransformStage>>,
    hooks: Arc<dyn Hooks>,
}

impl ApiConfigBuilder {
    /// Add a default header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.additional_headers, &name.into(), value.into());
        self
    }

    /// Append a stage to the outbound transform list.
    pub fn request_transform(mut self, stage: Arc<dyn TransformStage>) -> Self {
        self.request_transforms.push(stage);
        self
    }

    /// Append a stage to the inbound transform list.
    pub fn response_transform(mut self, stage: Arc<dyn TransformStage>) -> Self {
        self.response_transforms.push(stage);
        self
    }

    /// Install the observer hooks fired around every round-trip.
    pub fn hooks(mut self, hooks: Arc<dyn Hooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn build(self) -> ApiConfig {
        ApiConfig {
            root_path: self.root_path.trim_end_matches('/').to_string(),
            additional_headers: self.additional_headers,
            request_transforms: self.request_transforms,
            response_transforms: self.response_transforms,
            hooks: self.hooks,
        }
    }
}

/// Options supplied by one call site.
#[derive(Clone, Default)]
pub struct CallOptions {
    /// Headers merged over the configured defaults.
    pub headers: Vec<(String, String)>,
    /// Replacement body pipeline for this call. Forces `X-ENCRYPTED: yes`
    /// and supersedes the configured transform lists.
    pub codec: Option<Arc<dyn BodyCodec>>,
}

impl CallOptions {
    /// Add a header to this call.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Use a custom body codec for this call.
    pub fn codec(mut self, codec: Arc<dyn BodyCodec>) -> Self {
        self.codec = Some(codec);
        self
    }
}

/// Outcome of merging [`ApiConfig`] with one call's [`CallOptions`].
pub struct ResolvedCall {
    pub headers: Vec<(String, String)>,
    pub codec_override: Option<Arc<dyn BodyCodec>>,
    /// Always `true`; credentials inclusion is not overridable per call.
    pub with_credentials: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::error::ApiError;
    use crate::http::header_value;
    use crate::transform::JsonCodec;

    fn bare_config(root: &str) -> ApiConfig {
        ApiConfig::builder(root).build()
    }

    #[test]
    fn resolve_url_inserts_exactly_one_slash() {
        for root in ["https://api.x", "https://api.x/"] {
            for path in ["a", "/a"] {
                let url = bare_config(root).resolve_url(path);
                assert_eq!(url, "https://api.x/a", "root {root:?} + path {path:?}");
            }
        }
    }

    #[test]
    fn resolve_url_keeps_nested_paths_intact() {
        let url = bare_config("https://svc").resolve_url("/items/1");
        assert_eq!(url, "https://svc/items/1");
    }

    #[test]
    fn caller_headers_override_configured_defaults() {
        let config = ApiConfig::builder("https://svc")
            .header("Accept-Language", "en")
            .header("X-Team", "billing")
            .build();
        let options = CallOptions::default().header("accept-language", "de");
        let resolved = config.resolve_call(&options);
        assert_eq!(header_value(&resolved.headers, "accept-language"), Some("de"));
        assert_eq!(header_value(&resolved.headers, "x-team"), Some("billing"));
    }

    #[test]
    fn marker_is_no_without_request_transforms() {
        let resolved = bare_config("https://svc").resolve_call(&CallOptions::default());
        assert_eq!(header_value(&resolved.headers, ENCRYPTED_HEADER), Some("no"));
    }

    #[test]
    fn marker_is_yes_with_request_transforms() {
        let config = ApiConfig::builder("https://svc")
            .request_transform(std::sync::Arc::new(|v: Value| Ok::<_, ApiError>(v)))
            .build();
        let resolved = config.resolve_call(&CallOptions::default());
        assert_eq!(header_value(&resolved.headers, ENCRYPTED_HEADER), Some("yes"));
    }

    #[test]
    fn response_transforms_alone_do_not_set_the_marker() {
        let config = ApiConfig::builder("https://svc")
            .response_transform(std::sync::Arc::new(|v: Value| Ok::<_, ApiError>(v)))
            .build();
        let resolved = config.resolve_call(&CallOptions::default());
        assert_eq!(header_value(&resolved.headers, ENCRYPTED_HEADER), Some("no"));
    }

    #[test]
    fn call_codec_forces_the_marker() {
        let options = CallOptions::default().codec(std::sync::Arc::new(JsonCodec));
        let resolved = bare_config("https://svc").resolve_call(&options);
        assert_eq!(header_value(&resolved.headers, ENCRYPTED_HEADER), Some("yes"));
        assert!(resolved.codec_override.is_some());
    }

    #[test]
    fn computed_marker_outranks_caller_header() {
        let options = CallOptions::default().header(ENCRYPTED_HEADER, "yes");
        let resolved = bare_config("https://svc").resolve_call(&options);
        assert_eq!(header_value(&resolved.headers, ENCRYPTED_HEADER), Some("no"));
    }

    #[test]
    fn credentials_are_always_included() {
        let resolved = bare_config("https://svc").resolve_call(&CallOptions::default());
        assert!(resolved.with_credentials);
    }
}
