use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::warn;

use crate::infra::app_state::AppState;

/// Reports the build version and whether the store answers.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let backend = state.store.backend();
    let (status, store) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, json!({ "backend": backend, "status": "healthy" })),
        Err(err) => {
            warn!(error = %err, backend, "store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "backend": backend, "status": "unhealthy" }),
            )
        }
    };

    let overall = if status.is_success() { "healthy" } else { "unhealthy" };
    (
        status,
        Json(json!({
            "status": overall,
            "version": env!("CARGO_PKG_VERSION"),
            "store": store,
        })),
    )
}
