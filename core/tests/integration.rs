//! Full pipeline tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every public verb
//! through `ApiClient` over the real reqwest transport. Validates envelope
//! interpretation, header behavior (observed via the echo route), the
//! custom-codec contract, and both failure families end-to-end.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use apigate_core::{
    ApiClient, ApiConfig, ApiError, BodyCodec, CallOptions, JsonCodec, Schema, TypedSchema,
};

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        mock_server::run(listener).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base: &str) -> ApiClient {
    ApiClient::new(ApiConfig::builder(base).build()).unwrap()
}

/// Mirrors the mock server's item shape. Defined independently so these
/// tests catch schema drift between the two crates.
#[derive(Debug, Clone, Deserialize, PartialEq)]
struct Item {
    id: uuid::Uuid,
    name: String,
    quantity: u32,
}

#[tokio::test]
async fn crud_lifecycle() {
    let base = start_server().await;
    let api = client(&base);

    // list — empty
    let payload = api.get("/items", CallOptions::default()).await.unwrap();
    assert_eq!(payload, json!([]));

    // create
    let created = api
        .post(
            "/items",
            Some(json!({"name": "bolt", "quantity": 2})),
            CallOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(created["name"], "bolt");
    let id = created["id"].as_str().unwrap().to_string();

    // get
    let fetched = api
        .get(&format!("/items/{id}"), CallOptions::default())
        .await
        .unwrap();
    assert_eq!(fetched, created);

    // put — full replacement
    let replaced = api
        .put(
            &format!("/items/{id}"),
            Some(json!({"name": "nut", "quantity": 1})),
            CallOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(replaced["name"], "nut");
    assert_eq!(replaced["quantity"], 1);

    // patch — partial
    let patched = api
        .patch(
            &format!("/items/{id}"),
            Some(json!({"quantity": 9})),
            CallOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(patched["name"], "nut"); // unchanged
    assert_eq!(patched["quantity"], 9);

    // delete — success with no payload yields true
    let gone = api
        .delete(&format!("/items/{id}"), CallOptions::default())
        .await
        .unwrap();
    assert_eq!(gone, Value::Bool(true));

    // get after delete — envelope 404
    let err = api
        .get(&format!("/items/{id}"), CallOptions::default())
        .await
        .unwrap_err();
    match err {
        ApiError::Protocol { code, message } => {
            assert_eq!(code, 404);
            assert_eq!(message, "item not found");
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn envelope_failures_reject_with_protocol_errors() {
    let base = start_server().await;
    let api = client(&base);

    let err = api.get("/failure", CallOptions::default()).await.unwrap_err();
    match err {
        ApiError::Protocol { code, message } => {
            assert_eq!(code, 500);
            assert_eq!(message, "internal failure");
        }
        other => panic!("expected protocol error, got {other:?}"),
    }

    let err = api.get("/teapot", CallOptions::default()).await.unwrap_err();
    assert!(matches!(err, ApiError::Protocol { code: 418, .. }));
}

#[tokio::test]
async fn default_pipeline_headers_reach_the_server() {
    let base = start_server().await;
    let config = ApiConfig::builder(base.as_str())
        .header("X-Team", "billing")
        .build();
    let api = ApiClient::new(config).unwrap();

    let payload = api
        .post("/echo", Some(json!({"ping": 1})), CallOptions::default())
        .await
        .unwrap();

    assert_eq!(payload["headers"]["x-encrypted"], "no");
    assert_eq!(payload["headers"]["content-type"], "application/json");
    assert_eq!(payload["headers"]["x-team"], "billing");
    assert_eq!(payload["body"], r#"{"ping":1}"#);
}

#[tokio::test]
async fn config_transforms_mark_the_pipeline_on_the_wire() {
    let base = start_server().await;
    let config = ApiConfig::builder(base.as_str())
        .request_transform(Arc::new(|v: Value| {
            Ok::<_, ApiError>(json!({ "wrapped": v }))
        }))
        .build();
    let api = ApiClient::new(config).unwrap();

    let payload = api
        .post("/echo", Some(json!({"ping": 1})), CallOptions::default())
        .await
        .unwrap();

    assert_eq!(payload["headers"]["x-encrypted"], "yes");
    assert_eq!(payload["body"], r#"{"wrapped":{"ping":1}}"#);
}

/// Codec standing in for an encrypting pipeline: bodies travel as
/// `{"sealed": <payload>}` in both directions.
struct SealingCodec;

impl BodyCodec for SealingCodec {
    fn encode(
        &self,
        value: &Value,
        headers: &mut Vec<(String, String)>,
    ) -> Result<String, ApiError> {
        apigate_core::http::ensure_header(headers, "Content-Type", "application/json");
        serde_json::to_string(&json!({ "sealed": value }))
            .map_err(|e| ApiError::Encode(e.to_string()))
    }

    fn decode(&self, wire: &Value) -> Result<Value, ApiError> {
        let parsed = JsonCodec.decode(wire)?;
        Ok(parsed.get("sealed").cloned().unwrap_or(parsed))
    }
}

#[tokio::test]
async fn custom_codec_round_trips_and_signals_the_server() {
    let base = start_server().await;
    let api = client(&base);

    // The sealed route only understands the codec's wire format.
    let payload = api
        .post(
            "/sealed",
            Some(json!({"name": "gear"})),
            CallOptions::default().codec(Arc::new(SealingCodec)),
        )
        .await
        .unwrap();
    assert_eq!(payload, json!({"name": "gear"}));

    // The echo route shows the marker the server saw.
    let payload = api
        .post(
            "/echo",
            Some(json!({"ping": 1})),
            CallOptions::default().codec(Arc::new(SealingCodec)),
        )
        .await
        .unwrap();
    assert_eq!(payload["headers"]["x-encrypted"], "yes");
    assert_eq!(payload["body"], r#"{"sealed":{"ping":1}}"#);
}

#[tokio::test]
async fn http_level_rejection_is_a_transport_error() {
    let base = start_server().await;
    let api = client(&base);

    // The mock server's JSON extractor rejects this body outright, so the
    // failure happens at the HTTP layer before any envelope exists.
    let err = api
        .post("/items", Some(json!({"quantity": true})), CallOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn validated_surface_returns_typed_data() {
    let base = start_server().await;
    let api = client(&base);

    let created: Item = api
        .post_as(
            "/items",
            json!({"name": "bolt", "quantity": 2}),
            &TypedSchema::<Value>::new(),
            &TypedSchema::<Item>::new(),
            CallOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(created.name, "bolt");

    let all: Vec<Item> = api
        .get_as("/items", &TypedSchema::<Vec<Item>>::new(), CallOptions::default())
        .await
        .unwrap();
    assert_eq!(all, vec![created]);
}

#[tokio::test]
async fn validated_surface_rejects_contract_drift() {
    #[derive(Debug, Deserialize)]
    struct WrongShape {
        #[allow(dead_code)]
        count: u64,
    }

    let base = start_server().await;
    let api = client(&base);

    let err = api
        .get_as("/items", &TypedSchema::<WrongShape>::new(), CallOptions::default())
        .await
        .unwrap_err();
    match err {
        ApiError::Validation(e) => assert!(!e.issues.is_empty()),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn schema_check_does_not_mutate_the_payload() {
    let schema = TypedSchema::<Value>::new();
    let payload = json!({"keep": "me"});
    schema.check(&payload).unwrap();
    assert_eq!(payload, json!({"keep": "me"}));
}
