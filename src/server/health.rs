use super::router::HubState;
use crate::db::StoreReadiness;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub mode: &'static str,
    pub mailer: &'static str,
    pub stores: StoreReadiness,
}

/// GET /health -> 200 when both stores answer, 503 otherwise.
pub async fn health_handler(State(state): State<HubState>) -> impl IntoResponse {
    let stores = state.stores.readiness().await;
    let (code, status) = if stores.all_ready() {
        (StatusCode::OK, "ok")
    } else {
        warn!(primary = stores.primary, media = stores.media, "health check degraded");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            mode: state.mode.as_str(),
            mailer: state.mailer.transport().name(),
            stores,
        }),
    )
}
