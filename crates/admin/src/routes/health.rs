//! Health checks.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
}

/// GET /health
async fn health() -> &'static str {
    "ok"
}

/// Ready when the GraphQL backend answers.
///
/// GET /health/ready
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.api().ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready", "api": "ok" }))),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "not_ready", "api": "unreachable" })),
            )
        }
    }
}
