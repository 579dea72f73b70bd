use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::infrastructure::db::{PgPool, ping};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResp {
    pub status: &'static str,
}

#[utoipa::path(
    get,
    path = "/actuator/health",
    tag = "Health",
    responses(
        (status = 200, body = HealthResp),
        (status = 503, body = HealthResp, description = "Database unreachable")
    )
)]
pub async fn health(State(pool): State<PgPool>) -> (StatusCode, Json<HealthResp>) {
    match ping(&pool).await {
        Ok(()) => (StatusCode::OK, Json(HealthResp { status: "UP" })),
        Err(err) => {
            tracing::warn!(error = ?err, "health_check_failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResp { status: "DOWN" }),
            )
        }
    }
}

pub fn routes(pool: PgPool) -> Router {
    Router::new()
        .route("/actuator/health", get(health))
        .with_state(pool)
}
