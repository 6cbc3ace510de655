//! Liveness and readiness checks.

use crate::models::ReadinessResponse;
use crate::routes::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /health
///
/// Liveness only; never touches the database.
#[instrument(skip_all, name = "bs.health.check")]
pub async fn health_check() -> &'static str {
    "OK"
}

/// Handler for GET /ready
///
/// Pings the database. Returns 503 with `"status": "not_ready"` when the
/// ping fails so orchestrators stop routing traffic here.
#[instrument(skip_all, name = "bs.health.ready")]
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    if db_healthy {
        (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready".to_string(),
                database: Some("healthy".to_string()),
            }),
        )
    } else {
        tracing::warn!(target: "bs.handlers.health", "Readiness check failed: database unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "not_ready".to_string(),
                database: Some("unhealthy".to_string()),
            }),
        )
    }
}
