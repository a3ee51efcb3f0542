use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::research::error::{ErrorKind, PipelineError};
use crate::research::models::{validate_query, ModelError};

// ============= API Request/Response Types =============

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResearchRequest {
    /// Research question to investigate (1-1000 characters)
    #[schema(
        min_length = 1,
        max_length = 1000,
        example = "What are the latest developments in quantum computing?"
    )]
    pub query: String,
}

impl ResearchRequest {
    pub fn validate(&self) -> Result<()> {
        validate_query(&self.query).map_err(|e| match e {
            ModelError::QueryLength(0) => {
                AppError::InvalidInput("query must not be empty".to_string())
            }
            other => AppError::InvalidInput(other.to_string()),
        })
    }
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error tag, e.g. `PlanningError`
    #[schema(example = "PlanningError")]
    pub error: String,
    /// User-safe description
    #[schema(example = "Unable to create research plan. Please try a different query.")]
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code and client-facing body. Diagnostic detail stays in logs.
    pub fn to_response_parts(&self) -> (axum::http::StatusCode, ErrorResponse) {
        use axum::http::StatusCode;

        match self {
            AppError::Pipeline(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: err.kind().to_string(),
                    detail: err.safe_message().to_string(),
                },
            ),
            AppError::InvalidInput(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: ErrorKind::ValidationError.to_string(),
                    detail: msg.clone(),
                },
            ),
            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ErrorResponse {
                    error: "Forbidden".to_string(),
                    detail: msg.clone(),
                },
            ),
            AppError::LLM(_) | AppError::Configuration(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: ErrorKind::InternalServerError.to_string(),
                    detail: ErrorKind::InternalServerError.safe_message().to_string(),
                },
            ),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            AppError::Pipeline(err) => {
                tracing::warn!(error = %err, error_type = %err.kind(), "research_failed")
            }
            AppError::InvalidInput(_) | AppError::Forbidden(_) => {}
            other => tracing::error!(error = %other, "unhandled_error"),
        }

        let (status, body) = self.to_response_parts();
        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
