//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.stores.health_check().await {
        None => "memory",
        Some(true) => "connected",
        Some(false) => "unavailable",
    };
    let status = if database == "unavailable" { "degraded" } else { "ok" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    })
}
