pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::gateway::handlers;
use crate::state::AppState;

/// Generous ceiling for JSON generate bodies: the largest legal prompt pair
/// plus headroom for JSON escaping.
const GENERATE_BODY_LIMIT: usize = 512 * 1024;
/// CV uploads: PDFs with embedded fonts get big fast.
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/register", post(handlers::register))
        .route(
            "/api/generate",
            post(handlers::generate).layer(DefaultBodyLimit::max(GENERATE_BODY_LIMIT)),
        )
        .route(
            "/api/cv/upload",
            post(handlers::upload_cv).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .with_state(state)
}
