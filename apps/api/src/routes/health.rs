use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::llm_client::ModelBackend;
use crate::state::AppState;

/// GET /api/health
/// Liveness plus the preferred provider/model the chain will try first.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "provider": state.backend.provider(),
        "model": state.backend.model(),
    }))
}
