//! Shared fixtures for integration tests.

#![allow(dead_code)]

pub mod mocks;

use std::sync::Arc;

use deepr::research::{
    ResearchAgents, ResearchPlan, ResearchReport, SearchResult, SearchStep, ValidationResult,
};
use deepr::AgentError;

use mocks::MockAgent;

/// A plan with `steps` search steps named `step-1`, `step-2`, ...
pub fn plan_with_steps(steps: usize) -> ResearchPlan {
    let steps = (1..=steps)
        .map(|i| SearchStep::new(format!("step-{i}"), format!("purpose {i}")).unwrap())
        .collect();
    ResearchPlan::new("summary", steps, "compare sources").unwrap()
}

pub fn report() -> ResearchReport {
    ResearchReport {
        title: "Report".to_string(),
        summary: "A summary".to_string(),
        key_findings: vec!["finding".to_string()],
        sources: vec!["https://example.com".to_string()],
        limitations: String::new(),
    }
}

pub fn validation() -> ValidationResult {
    ValidationResult::new(true, 0.9, vec![], vec![]).unwrap()
}

/// Gatherer that echoes the search terms, failing for any terms listed.
pub fn gatherer_failing_on(failing: &[&str]) -> MockAgent<SearchResult> {
    let failing: Vec<String> = failing.iter().map(|s| s.to_string()).collect();
    MockAgent::from_fn("gatherer", move |input| {
        if failing.iter().any(|f| f == input) {
            return Err(AgentError::Search(format!("no results for '{input}'")));
        }
        Ok(SearchResult {
            query: input.to_string(),
            findings: vec![format!("finding for {input}")],
            sources: vec![format!("https://example.com/{input}")],
        })
    })
}

/// Four succeeding agents; the planner produces `steps` steps.
pub fn agents(steps: usize) -> ResearchAgents {
    ResearchAgents {
        planner: Arc::new(MockAgent::returning("planner", plan_with_steps(steps))),
        gatherer: Arc::new(gatherer_failing_on(&[])),
        synthesizer: Arc::new(MockAgent::returning("synthesizer", report())),
        verifier: Arc::new(MockAgent::returning("verifier", validation())),
    }
}
