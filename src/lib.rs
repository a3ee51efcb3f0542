//! # deepr - four-phase deep research server
//!
//! deepr answers a research question by running four phases in order:
//! planning, parallel web gathering, synthesis into a report, and
//! verification of that report. Progress can be streamed to clients as
//! server-sent events.
//!
//! ## Overview
//!
//! deepr can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `deepr-server` binary
//! 2. **As a library** - Embed the pipeline in your own Rust project
//!
//! ### Running a workflow
//!
//! ```rust,ignore
//! use deepr::{AgentRegistry, ResearchConfig, ResearchWorkflow};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ResearchConfig::load("deepr.toml")?;
//!     let registry = AgentRegistry::from_config(&config).await?;
//!
//!     let result = ResearchWorkflow::from_registry(&registry)
//!         .run("What are the latest developments in quantum computing?")
//!         .await?;
//!     println!("{}", result.report.title);
//!     Ok(())
//! }
//! ```
//!
//! ### Streaming progress
//!
//! ```rust,ignore
//! use deepr::research::{ResearchStream, StreamConfig, StreamFrame};
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//!
//! let (tx, mut rx) = mpsc::channel::<StreamFrame>(100);
//! let agents = registry.agents();
//! ResearchStream::spawn(
//!     move |publisher| async move {
//!         ResearchWorkflow::new(agents)
//!             .with_sink(Arc::new(publisher))
//!             .run("query")
//!             .await
//!     },
//!     StreamConfig::default(),
//!     tx,
//! );
//! while let Some(frame) = rx.recv().await {
//!     print!("{}", frame.format());
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local inference (default) |
//! | `openai` | OpenAI API and compatible endpoints |
//! | `swagger-ui` | Interactive API docs at `/swagger-ui` |
//!
//! ## Modules
//!
//! - [`research`] - Pipeline data model, orchestrator and event streaming
//! - [`agents`] - Structured-output agents for each research role
//! - [`api`] - REST API handlers and routes
//! - [`llm`] - LLM client implementations
//! - [`tools`] - Web search
//! - [`types`] - HTTP types and error handling
//! - [`utils`] - Configuration loading

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Research role agents and their registry.
pub mod agents;
/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// LLM client abstractions and providers.
pub mod llm;
/// Four-phase research pipeline.
pub mod research;
/// External tools (web search).
pub mod tools;
/// Request, response and error types.
pub mod types;
/// Configuration utilities.
pub mod utils;

pub use agents::{AgentError, AgentRegistry, StructuredAgent};
pub use llm::{LLMClient, Provider, ProviderRegistry};
pub use research::{
    PipelineError, ResearchAgents, ResearchEvent, ResearchResult, ResearchStream,
    ResearchWorkflow, StreamConfig,
};
pub use types::{AppError, Result};
pub use utils::toml_config::ResearchConfig;

use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ResearchConfig>,
    /// Default agents shared by every request
    pub agents: ResearchAgents,
    /// Multiplexer limits for streaming requests
    pub stream_config: StreamConfig,
}

impl AppState {
    pub fn new(config: ResearchConfig, registry: &AgentRegistry) -> Self {
        Self::with_agents(config, registry.agents())
    }

    pub fn with_agents(config: ResearchConfig, agents: ResearchAgents) -> Self {
        let stream_config = config.stream_config();
        Self {
            config: Arc::new(config),
            agents,
            stream_config,
        }
    }
}

/// Build the full application router with middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::routes::create_router().with_state(state);

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::docs::ApiDoc::openapi()),
        )
    };

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
}
