use crate::types::HealthResponse;
use axum::Json;

fn status(status: &str, version: Option<&str>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: status.to_string(),
        version: version.map(str::to_string),
    })
}

/// Service status and version
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse)),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    status("ok", Some(env!("CARGO_PKG_VERSION")))
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health/liveness",
    responses((status = 200, description = "Process is alive", body = HealthResponse)),
    tag = "health"
)]
pub async fn liveness() -> Json<HealthResponse> {
    status("alive", None)
}

/// Readiness probe
#[utoipa::path(
    get,
    path = "/health/readiness",
    responses((status = 200, description = "Ready for requests", body = HealthResponse)),
    tag = "health"
)]
pub async fn readiness() -> Json<HealthResponse> {
    status("ready", None)
}
