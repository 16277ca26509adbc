use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub classifier: String,
    pub classifier_ready: bool,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.classifier.health_check().await;

    Json(HealthResponse {
        status: if ready { "ok" } else { "degraded" }.to_string(),
        classifier: state.classifier.backend_name().to_string(),
        classifier_ready: ready,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
