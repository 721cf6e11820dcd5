use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::observability::render_metrics;

/// Plain-text liveness message on `GET /`.
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    match state.home_message.as_deref() {
        Some(message) => (StatusCode::OK, message.to_string()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Health check endpoint for Docker/K8s liveness probes.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "prediction-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        render_metrics(),
    )
}
