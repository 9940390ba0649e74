//! The typed call surface: verb wrappers over the request pipeline.
//!
//! # Design
//! `ApiClient` composes the whole pipeline for one configured service:
//! resolve URL and headers, validate and encode the outbound payload, send
//! through the gateway, decode the response, interpret the envelope, and
//! (for the `*_as` variants) validate the payload into typed data. The
//! dynamic verbs return raw [`Value`] payloads; the validated verbs are the
//! same pipeline with schemas bound at both ends. One client instance is
//! cheap to share across tasks — each call builds its own descriptor.

use std::sync::Arc;

use serde_json::Value;

use crate::config::{ApiConfig, CallOptions};
use crate::envelope::ResponseEnvelope;
use crate::error::{ApiError, TransportError};
use crate::gateway::Gateway;
use crate::http::{HttpMethod, RequestDescriptor, RequestId};
use crate::schema::Schema;
use crate::transform::{self, BodyCodec, JsonCodec};
use crate::transport::{ReqwestTransport, Transport};

pub struct ApiClient {
    config: ApiConfig,
    gateway: Gateway,
}

impl ApiClient {
    /// Build a client over the production HTTP transport.
    pub fn new(config: ApiConfig) -> Result<Self, TransportError> {
        let transport = Arc::new(ReqwestTransport::new()?);
        Ok(Self::with_transport(config, transport))
    }

    /// Build a client over a caller-supplied transport.
    pub fn with_transport(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        let gateway = Gateway::new(transport, config.hooks());
        Self { config, gateway }
    }

    // ------------------------------------------------------------------
    // Dynamic surface — raw payloads
    // ------------------------------------------------------------------

    pub async fn get(&self, path: &str, options: CallOptions) -> Result<Value, ApiError> {
        self.request(HttpMethod::Get, path, None, &options).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: Option<Value>,
        options: CallOptions,
    ) -> Result<Value, ApiError> {
        self.request(HttpMethod::Post, path, body, &options).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: Option<Value>,
        options: CallOptions,
    ) -> Result<Value, ApiError> {
        self.request(HttpMethod::Put, path, body, &options).await
    }

    pub async fn patch(
        &self,
        path: &str,
        body: Option<Value>,
        options: CallOptions,
    ) -> Result<Value, ApiError> {
        self.request(HttpMethod::Patch, path, body, &options).await
    }

    pub async fn delete(&self, path: &str, options: CallOptions) -> Result<Value, ApiError> {
        self.request(HttpMethod::Delete, path, None, &options).await
    }

    // ------------------------------------------------------------------
    // Validated surface — schemas bound at both ends
    // ------------------------------------------------------------------

    pub async fn get_as<S: Schema>(
        &self,
        path: &str,
        response_schema: &S,
        options: CallOptions,
    ) -> Result<S::Output, ApiError> {
        let payload = self.request(HttpMethod::Get, path, None, &options).await?;
        Ok(response_schema.parse(payload)?)
    }

    pub async fn post_as<Q: Schema, S: Schema>(
        &self,
        path: &str,
        body: Value,
        request_schema: &Q,
        response_schema: &S,
        options: CallOptions,
    ) -> Result<S::Output, ApiError> {
        request_schema.check(&body)?;
        let payload = self
            .request(HttpMethod::Post, path, Some(body), &options)
            .await?;
        Ok(response_schema.parse(payload)?)
    }

    pub async fn put_as<Q: Schema, S: Schema>(
        &self,
        path: &str,
        body: Value,
        request_schema: &Q,
        response_schema: &S,
        options: CallOptions,
    ) -> Result<S::Output, ApiError> {
        request_schema.check(&body)?;
        let payload = self
            .request(HttpMethod::Put, path, Some(body), &options)
            .await?;
        Ok(response_schema.parse(payload)?)
    }

    pub async fn patch_as<Q: Schema, S: Schema>(
        &self,
        path: &str,
        body: Value,
        request_schema: &Q,
        response_schema: &S,
        options: CallOptions,
    ) -> Result<S::Output, ApiError> {
        request_schema.check(&body)?;
        let payload = self
            .request(HttpMethod::Patch, path, Some(body), &options)
            .await?;
        Ok(response_schema.parse(payload)?)
    }

    pub async fn delete_as<S: Schema>(
        &self,
        path: &str,
        response_schema: &S,
        options: CallOptions,
    ) -> Result<S::Output, ApiError> {
        let payload = self.request(HttpMethod::Delete, path, None, &options).await?;
        Ok(response_schema.parse(payload)?)
    }

    // ------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------

    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        options: &CallOptions,
    ) -> Result<Value, ApiError> {
        let url = self.config.resolve_url(path);
        let resolved = self.config.resolve_call(options);
        let mut headers = resolved.headers;

        // A per-call codec replaces the configured transform lists.
        let use_config_stages = resolved.codec_override.is_none();
        let codec: Arc<dyn BodyCodec> = resolved
            .codec_override
            .unwrap_or_else(|| Arc::new(JsonCodec));

        let encoded = match body {
            Some(payload) => {
                match self.encode_body(payload, codec.as_ref(), &mut headers, use_config_stages) {
                    Ok(wire) => Some(wire),
                    Err(err) => {
                        self.gateway.report_prepare_failure(&err);
                        return Err(err);
                    }
                }
            }
            None => None,
        };

        let request = RequestDescriptor {
            id: RequestId::new_random(),
            method,
            url,
            headers,
            body: encoded,
            with_credentials: resolved.with_credentials,
        };

        let response = self.gateway.send(request).await?;

        let decoded = codec.decode(&Value::String(response.body))?;
        let decoded = if use_config_stages {
            transform::apply_stages(self.config.response_transforms(), decoded)?
        } else {
            decoded
        };
        let envelope = ResponseEnvelope::from_value(decoded)?;
        envelope.into_payload()
    }

    fn encode_body(
        &self,
        payload: Value,
        codec: &dyn BodyCodec,
        headers: &mut Vec<(String, String)>,
        use_config_stages: bool,
    ) -> Result<String, ApiError> {
        let staged = if use_config_stages {
            transform::apply_stages(self.config.request_transforms(), payload)?
        } else {
            payload
        };
        codec.encode(&staged, headers)
    }
}
