use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use shared::HealthResponse;
use tracing::warn;

use crate::AppState;

const PING_TIMEOUT: Duration = Duration::from_secs(5);

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Liveness plus a `SELECT 1` against the store; 503 when the store is down
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = tokio::time::timeout(PING_TIMEOUT, state.db.ping())
        .await
        .unwrap_or(false);

    let status = if database_ok {
        StatusCode::OK
    } else {
        warn!("Health check: database did not answer");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if database_ok { "OK" } else { "DEGRADED" }.to_string(),
            message: "Dojo attendance API is running".to_string(),
            database: if database_ok { "ok" } else { "error" }.to_string(),
        }),
    )
}
