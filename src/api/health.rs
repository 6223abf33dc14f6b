use crate::api::AppState;
use axum::{Json, Router, routing::get};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "timestamp": Utc::now().to_rfc3339() }))
}

/// Health check route.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
