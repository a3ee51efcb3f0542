//! Parallel gathering fan-out
//!
//! One task per plan step, all started together on a [`JoinSet`]. A failed
//! or panicked search is logged and counted; it never cancels its siblings.
//! The phase fails only when every search failed.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::agents::{AgentError, StructuredAgent};

use super::events::{Phase, ProgressSink, ResearchEvent};
use super::models::{SearchResult, SearchStep};

/// Every search in the phase failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("all {attempted} searches failed")]
pub struct AllFailed {
    pub attempted: usize,
    pub failed: usize,
}

/// Why one search step produced no result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepFailure {
    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("search task panicked")]
    Panicked,
}

pub type StepOutcome = Result<SearchResult, StepFailure>;

/// Run every step concurrently and collect the successes in completion order.
pub async fn gather(
    searcher: Arc<dyn StructuredAgent<SearchResult>>,
    steps: &[SearchStep],
    sink: &dyn ProgressSink,
) -> Result<Vec<SearchResult>, AllFailed> {
    let total = steps.len();
    let mut set = JoinSet::new();
    let mut terms_by_task = HashMap::with_capacity(total);

    for step in steps {
        let searcher = Arc::clone(&searcher);
        let terms = step.search_terms().to_string();
        let handle = set.spawn({
            let terms = terms.clone();
            async move {
                let outcome: StepOutcome = searcher.run(&terms).await.map_err(StepFailure::from);
                outcome
            }
        });
        terms_by_task.insert(handle.id(), terms);
    }

    let mut results = Vec::with_capacity(total);
    let mut failures = 0usize;
    let mut completed = 0usize;

    while let Some(joined) = set.join_next_with_id().await {
        let (id, outcome) = match joined {
            Ok((id, outcome)) => (id, outcome),
            Err(e) => (e.id(), Err(StepFailure::Panicked)),
        };
        let terms = terms_by_task.remove(&id).unwrap_or_default();
        completed += 1;

        match outcome {
            Ok(result) => results.push(result),
            Err(e) => {
                failures += 1;
                tracing::warn!(
                    search_terms = %terms,
                    error = %e,
                    "workflow.gathering.search_failed"
                );
            }
        }

        sink.emit(ResearchEvent::GatheringProgress {
            completed,
            total,
            current_query: terms,
        })
        .await;
    }

    if results.is_empty() {
        return Err(AllFailed {
            attempted: total,
            failed: failures,
        });
    }

    if failures > 0 {
        sink.emit(ResearchEvent::PhaseWarning {
            phase: Phase::Gathering,
            warning: format!(
                "{failures} of {total} searches failed, continuing with partial results"
            ),
        })
        .await;
    }

    Ok(results)
}
