//! Structured-output agents
//!
//! Each pipeline role (planner, gatherer, synthesizer, verifier) is a
//! [`StructuredAgent`]: text in, one validated value out. The pipeline only
//! sees the trait, so tests substitute deterministic fakes.

/// LLM-backed agent that parses a JSON object out of the model reply.
pub mod structured;
/// Web search plus LLM extraction for the gathering role.
pub mod search;
/// Default system prompts per role.
pub mod prompts;
pub mod registry;

use async_trait::async_trait;

use crate::types::AppError;

pub use registry::AgentRegistry;
pub use search::WebSearchAgent;
pub use structured::LlmAgent;

/// Failure of a single structured-output operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AgentError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Invalid structured output: {0}")]
    InvalidOutput(String),

    #[error("Web search failed: {0}")]
    Search(String),
}

impl From<AppError> for AgentError {
    fn from(err: AppError) -> Self {
        AgentError::Llm(err.to_string())
    }
}

/// An operation producing one value of `T` from a text prompt.
#[async_trait]
pub trait StructuredAgent<T>: Send + Sync {
    async fn run(&self, input: &str) -> Result<T, AgentError>;

    /// Agent name used in logs.
    fn name(&self) -> &str;
}
