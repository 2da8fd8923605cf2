// handlers/public/mod.rs - Public handlers (no bearer token required)
//
// Service banner, liveness, and the OAuth/verification entry points a client
// calls before it holds a completed profile.

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub mod auth;

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello from CareNet API" }))
}

/// GET /health
///
/// Reports configuration state only; no request is made to Supabase.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "supabase_connected": state.supabase.is_some(),
        "service_role_enabled": state.service_role_enabled(),
        "timestamp": chrono::Utc::now(),
    }))
}
