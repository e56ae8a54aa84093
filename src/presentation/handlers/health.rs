use crate::infrastructure::db::DbPool;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// Liveness of the faculty portal service: reports whether the account and
/// faculty record store answers a trivial query.
pub async fn health_check(State(pool): State<DbPool>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").fetch_one(&pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "service": "faculty-portal",
                "status": "healthy",
                "database": "connected"
            })),
        ),
        Err(e) => {
            tracing::error!(error = ?e, "faculty store unreachable, reporting unhealthy");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "service": "faculty-portal",
                    "status": "unhealthy",
                    "database": "disconnected"
                })),
            )
        }
    }
}
