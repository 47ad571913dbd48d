use axum::Json;
use serde_json::{Value, json};

/// Handler for `GET /`
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}
