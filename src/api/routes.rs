use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn create_router() -> Router<AppState> {
    let research_routes = Router::new()
        .route("/research", post(crate::api::handlers::research::research))
        .route(
            "/research/stream",
            post(crate::api::handlers::research::research_stream),
        );

    let health_routes = Router::new()
        .route("/health", get(crate::api::handlers::health::health))
        .route(
            "/health/liveness",
            get(crate::api::handlers::health::liveness),
        )
        .route(
            "/health/readiness",
            get(crate::api::handlers::health::readiness),
        );

    research_routes.merge(health_routes)
}
