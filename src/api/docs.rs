use utoipa::OpenApi;

use crate::api::handlers::{health, research};
use crate::research::{
    events::ErrorPayload, ErrorKind, Phase, PhaseTimings, ResearchPlan, ResearchReport,
    ResearchResult, SearchResult, SearchStep, ValidationResult,
};
use crate::types::{ErrorResponse, HealthResponse, ResearchRequest};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "deepr",
        description = "Four-phase deep research: plan, gather, synthesize, verify"
    ),
    paths(
        research::research,
        research::research_stream,
        health::health,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        ResearchRequest,
        ResearchResult,
        ResearchPlan,
        SearchStep,
        SearchResult,
        ResearchReport,
        ValidationResult,
        PhaseTimings,
        ErrorResponse,
        ErrorPayload,
        ErrorKind,
        Phase,
        HealthResponse,
    )),
    tags(
        (name = "research", description = "Research pipeline"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

/// The OpenAPI document as pretty-printed JSON.
pub fn openapi_json() -> serde_json::Result<String> {
    ApiDoc::openapi().to_pretty_json()
}
