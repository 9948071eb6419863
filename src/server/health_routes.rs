use super::state::AppState;
use axum::{routing, Json, Router};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

#[derive(OpenApi)]
#[openapi(
    paths(serve_health),
    components(schemas(HealthReport, HealthStatus)),
    tags((name = "health", description = "Weather proxy liveness")),
)]
pub struct HealthApiDoc;

pub fn api() -> Router<AppState> {
    Router::new().route("/health", routing::get(serve_health))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub enum HealthStatus {
    Up,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HealthReport {
    pub status: HealthStatus,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
(status = 200, description = "Service is accepting requests", body = HealthReport),
    ),
)]
async fn serve_health() -> Json<HealthReport> {
    Json(HealthReport { status: HealthStatus::Up })
}
