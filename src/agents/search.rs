use std::sync::Arc;

use async_trait::async_trait;

use crate::llm::LLMClient;
use crate::research::models::SearchResult;
use crate::tools::search::{format_hits, WebSearch};

use super::structured::LlmAgent;
use super::{AgentError, StructuredAgent};

/// Gathering role: web search, then LLM extraction of findings.
pub struct WebSearchAgent {
    search: Arc<dyn WebSearch>,
    extractor: LlmAgent<SearchResult>,
    max_results: usize,
}

impl WebSearchAgent {
    pub fn new(
        search: Arc<dyn WebSearch>,
        llm: Arc<dyn LLMClient>,
        system_prompt: impl Into<String>,
        max_results: usize,
    ) -> Self {
        Self {
            search,
            extractor: LlmAgent::new("gatherer", system_prompt, llm),
            max_results: max_results.max(1),
        }
    }
}

#[async_trait]
impl StructuredAgent<SearchResult> for WebSearchAgent {
    async fn run(&self, input: &str) -> Result<SearchResult, AgentError> {
        let hits = self
            .search
            .search(input, self.max_results)
            .await
            .map_err(|e| AgentError::Search(e.0))?;
        if hits.is_empty() {
            return Err(AgentError::Search(format!("no results for '{input}'")));
        }
        tracing::debug!(search_terms = %input, hits = hits.len(), "web search completed");

        let prompt = format!(
            "Search terms: {input}\n\nWeb search results:\n{}\n\nExtract the key findings relevant to the search terms.",
            format_hits(&hits)
        );
        let mut result = self.extractor.run(&prompt).await?;

        // The result always describes the search that was executed
        result.query = input.to_string();
        if result.sources.is_empty() {
            result.sources = hits.into_iter().map(|hit| hit.url).collect();
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        self.extractor.name()
    }
}
