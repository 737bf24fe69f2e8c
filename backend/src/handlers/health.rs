//! Health check and liveness handlers

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.engine.store().backend_name().to_string(),
    })
}

pub async fn ping() -> Json<Value> {
    Json(json!({ "response": "pong" }))
}

pub async fn self_test() -> &'static str {
    "API is working"
}
