//! Envelope-speaking mock API server used by the core integration tests.
//!
//! Every route answers HTTP 200 and puts the real outcome in the response
//! envelope `{code, data, message, timestamp}`, so the client's envelope
//! interpretation is what gets exercised rather than HTTP status mapping.
//! The exceptions are axum's own extractor rejections (malformed JSON
//! bodies), which surface as HTTP-level failures — the tests use those to
//! drive the transport error path.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct CreateItem {
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub quantity: Option<u32>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Item>>>;

/// Wrap `data` in a success envelope.
pub fn envelope(data: Value) -> Value {
    json!({
        "code": 200,
        "data": data,
        "timestamp": Utc::now().to_rfc3339(),
    })
}

/// Build a failure envelope with the given business code.
pub fn envelope_error(code: i64, message: &str) -> Value {
    json!({
        "code": code,
        "message": message,
        "timestamp": Utc::now().to_rfc3339(),
    })
}

/// Build a success envelope with no payload.
pub fn envelope_empty() -> Value {
    json!({
        "code": 200,
        "timestamp": Utc::now().to_rfc3339(),
    })
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item)
                .put(replace_item)
                .patch(update_item)
                .delete(delete_item),
        )
        .route("/failure", get(failure))
        .route("/teapot", get(teapot))
        .route("/echo", post(echo))
        .route("/sealed", post(sealed))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_items(State(db): State<Db>) -> Json<Value> {
    let items = db.read().await;
    let mut all: Vec<Item> = items.values().cloned().collect();
    all.sort_by_key(|item| item.id);
    Json(envelope(json!(all)))
}

async fn create_item(State(db): State<Db>, Json(input): Json<CreateItem>) -> Json<Value> {
    let item = Item {
        id: Uuid::new_v4(),
        name: input.name,
        quantity: input.quantity,
    };
    db.write().await.insert(item.id, item.clone());
    Json(envelope(json!(item)))
}

async fn get_item(State(db): State<Db>, Path(id): Path<Uuid>) -> Json<Value> {
    let items = db.read().await;
    match items.get(&id) {
        Some(item) => Json(envelope(json!(item))),
        None => Json(envelope_error(404, "item not found")),
    }
}

async fn replace_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateItem>,
) -> Json<Value> {
    let mut items = db.write().await;
    match items.get_mut(&id) {
        Some(item) => {
            item.name = input.name;
            item.quantity = input.quantity;
            Json(envelope(json!(item)))
        }
        None => Json(envelope_error(404, "item not found")),
    }
}

async fn update_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateItem>,
) -> Json<Value> {
    let mut items = db.write().await;
    match items.get_mut(&id) {
        Some(item) => {
            if let Some(name) = input.name {
                item.name = name;
            }
            if let Some(quantity) = input.quantity {
                item.quantity = quantity;
            }
            Json(envelope(json!(item)))
        }
        None => Json(envelope_error(404, "item not found")),
    }
}

async fn delete_item(State(db): State<Db>, Path(id): Path<Uuid>) -> Json<Value> {
    let mut items = db.write().await;
    match items.remove(&id) {
        Some(_) => Json(envelope_empty()),
        None => Json(envelope_error(404, "item not found")),
    }
}

async fn failure() -> Json<Value> {
    Json(envelope_error(500, "internal failure"))
}

async fn teapot() -> Json<Value> {
    Json(envelope_error(418, "short and stout"))
}

/// Reflect the received headers and raw body back inside the envelope, so
/// clients can assert what actually went over the wire.
async fn echo(headers: HeaderMap, body: String) -> Json<Value> {
    let mut seen = serde_json::Map::new();
    for (name, value) in headers.iter() {
        seen.insert(
            name.as_str().to_string(),
            Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
        );
    }
    Json(envelope(json!({
        "headers": Value::Object(seen),
        "body": body,
    })))
}

/// Counterpart for clients using a sealing codec: unwrap `{"sealed": X}`,
/// then seal a success envelope around `X` in the response body.
async fn sealed(body: String) -> String {
    let value: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let inner = value.get("sealed").cloned().unwrap_or(Value::Null);
    json!({ "sealed": envelope(inner) }).to_string()
}
