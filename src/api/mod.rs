//! HTTP API Handlers and Routes
//!
//! The REST layer for deepr, built on Axum.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions
//! - [`api::docs`](crate::api::docs) - OpenAPI document
//!
//! # API Endpoints
//!
//! ## Research
//! - `POST /research` - Run the full pipeline and return the result
//! - `POST /research/stream` - Run the pipeline, streaming progress as SSE
//!
//! Both accept `?demo=true` to return fixture data without calling a model.
//! Demo mode is only available in the `development` and `staging`
//! environments.
//!
//! ## Health
//! - `GET /health` - Status and version
//! - `GET /health/liveness` - Process is up
//! - `GET /health/readiness` - Ready to accept research requests
//!
//! # OpenAPI Documentation
//!
//! `deepr-server openapi` prints the document. When the `swagger-ui` feature
//! is enabled, interactive documentation is served at `/swagger-ui/`.

/// OpenAPI document for all endpoints.
pub mod docs;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
