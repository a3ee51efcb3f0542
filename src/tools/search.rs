//! Web search backend using daedra
//!
//! daedra queries DuckDuckGo; no API key is needed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One hit returned by a web search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Search failed: {0}")]
pub struct SearchError(pub String);

/// Executes a web search for a query string.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError>;
}

/// DuckDuckGo search powered by daedra
#[derive(Debug, Default, Clone, Copy)]
pub struct DuckDuckGoSearch;

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: max_results,
                ..Default::default()
            }),
        };

        let response = daedra::tools::search::perform_search(&search_args)
            .await
            .map_err(|e| SearchError(e.to_string()))?;

        Ok(response
            .data
            .iter()
            .map(|r| SearchHit {
                title: r.title.to_string(),
                url: r.url.to_string(),
                description: r.description.to_string(),
            })
            .collect())
    }
}

/// Render hits as the numbered context block handed to the gatherer.
pub fn format_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            format!(
                "{}. {}\n   URL: {}\n   {}",
                i + 1,
                hit.title,
                hit.url,
                hit.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
