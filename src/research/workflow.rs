//! Four-phase research orchestrator
//!
//! Planning, gathering, synthesis and verification run strictly in order.
//! Gathering fans out one search per plan step and tolerates partial failure;
//! every other phase aborts the run on failure.

use std::sync::Arc;

use serde_json::json;
use tracing::Instrument;

use crate::agents::{AgentRegistry, StructuredAgent};

use super::error::PipelineError;
use super::events::{NoopSink, Phase, ProgressSink, ResearchEvent};
use super::gathering::gather;
use super::models::{
    ResearchPlan, ResearchReport, ResearchResult, SearchResult, ValidationResult,
};
use super::timing::PhaseTimer;

/// The four role agents a workflow depends on.
#[derive(Clone)]
pub struct ResearchAgents {
    pub planner: Arc<dyn StructuredAgent<ResearchPlan>>,
    pub gatherer: Arc<dyn StructuredAgent<SearchResult>>,
    pub synthesizer: Arc<dyn StructuredAgent<ResearchReport>>,
    pub verifier: Arc<dyn StructuredAgent<ValidationResult>>,
}

impl std::fmt::Debug for ResearchAgents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchAgents")
            .field("planner", &self.planner.name())
            .field("gatherer", &self.gatherer.name())
            .field("synthesizer", &self.synthesizer.name())
            .field("verifier", &self.verifier.name())
            .finish()
    }
}

pub struct ResearchWorkflow {
    agents: ResearchAgents,
    sink: Arc<dyn ProgressSink>,
}

impl ResearchWorkflow {
    pub fn new(agents: ResearchAgents) -> Self {
        Self {
            agents,
            sink: Arc::new(NoopSink),
        }
    }

    /// Workflow over the registry's shared default agents.
    pub fn from_registry(registry: &AgentRegistry) -> Self {
        Self::new(registry.agents())
    }

    pub fn builder(agents: ResearchAgents) -> ResearchWorkflowBuilder {
        ResearchWorkflowBuilder {
            agents,
            sink: Arc::new(NoopSink),
        }
    }

    /// Publish progress events to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Execute the full pipeline for `query`.
    pub async fn run(&self, query: &str) -> Result<ResearchResult, PipelineError> {
        let correlation_id = new_correlation_id();
        let span = tracing::info_span!("research", correlation_id = %correlation_id, query = %query);
        self.run_phases(query).instrument(span).await
    }

    async fn run_phases(&self, query: &str) -> Result<ResearchResult, PipelineError> {
        let timer = PhaseTimer::start();
        tracing::info!(query = %query, "workflow.started");

        // Phase 1: Planning
        self.start(Phase::Planning).await;
        let clock = timer.phase();
        let plan = self.agents.planner.run(query).await.map_err(|e| {
            tracing::error!(error = %e, "workflow.planning.failed");
            PipelineError::Planning {
                topic: query.to_string(),
                reason: e.to_string(),
            }
        })?;
        let planning_ms = clock.finish();
        tracing::info!(
            duration_ms = planning_ms,
            step_count = plan.step_count(),
            "workflow.planning.completed"
        );
        self.complete(
            Phase::Planning,
            planning_ms,
            json!({
                "executive_summary": plan.executive_summary(),
                "search_steps": plan.step_count(),
            }),
        )
        .await;

        // Phase 2: Gathering
        self.start(Phase::Gathering).await;
        let clock = timer.phase();
        let results = gather(
            Arc::clone(&self.agents.gatherer),
            plan.web_search_steps(),
            self.sink.as_ref(),
        )
        .await
        .map_err(|e| {
            tracing::error!(
                attempted = e.attempted,
                failed = e.failed,
                "workflow.gathering.failed"
            );
            PipelineError::Gathering {
                attempted: e.attempted,
                failed: e.failed,
            }
        })?;
        let gathering_ms = clock.finish();
        let failed = plan.step_count() - results.len();
        tracing::info!(
            duration_ms = gathering_ms,
            succeeded = results.len(),
            failed,
            "workflow.gathering.completed"
        );
        let total_findings: usize = results.iter().map(|r| r.findings.len()).sum();
        self.complete(
            Phase::Gathering,
            gathering_ms,
            json!({
                "searches_completed": results.len(),
                "total_findings": total_findings,
            }),
        )
        .await;

        // Phase 3: Synthesis
        self.start(Phase::Synthesis).await;
        let clock = timer.phase();
        let prompt = synthesis_prompt(query, &plan, &results);
        let report = self.agents.synthesizer.run(&prompt).await.map_err(|e| {
            tracing::error!(error = %e, "workflow.synthesis.failed");
            PipelineError::Synthesis {
                reason: e.to_string(),
            }
        })?;
        let synthesis_ms = clock.finish();
        tracing::info!(
            duration_ms = synthesis_ms,
            title = %report.title,
            "workflow.synthesis.completed"
        );
        self.complete(
            Phase::Synthesis,
            synthesis_ms,
            json!({
                "title": report.title,
                "key_findings_count": report.key_findings.len(),
            }),
        )
        .await;

        // Phase 4: Verification
        self.start(Phase::Verification).await;
        let clock = timer.phase();
        let prompt = verification_prompt(&report);
        let validation = self.agents.verifier.run(&prompt).await.map_err(|e| {
            tracing::error!(error = %e, "workflow.verification.failed");
            PipelineError::Verification {
                reason: e.to_string(),
            }
        })?;
        let verification_ms = clock.finish();
        tracing::info!(
            duration_ms = verification_ms,
            is_valid = validation.is_valid(),
            "workflow.verification.completed"
        );
        self.complete(
            Phase::Verification,
            verification_ms,
            json!({
                "is_valid": validation.is_valid(),
                "confidence_score": validation.confidence_score(),
            }),
        )
        .await;

        let timings = timer.assemble(planning_ms, gathering_ms, synthesis_ms, verification_ms);
        tracing::info!(total_ms = timings.total_ms, "workflow.completed");

        Ok(ResearchResult {
            query: query.to_string(),
            plan,
            search_results: results,
            report,
            validation,
            timings,
        })
    }

    async fn start(&self, phase: Phase) {
        self.sink.emit(ResearchEvent::PhaseStart { phase }).await;
    }

    async fn complete(&self, phase: Phase, duration_ms: u64, output_summary: serde_json::Value) {
        self.sink
            .emit(ResearchEvent::PhaseComplete {
                phase,
                duration_ms,
                output_summary,
            })
            .await;
    }
}

/// Overrides individual roles of a default agent set.
pub struct ResearchWorkflowBuilder {
    agents: ResearchAgents,
    sink: Arc<dyn ProgressSink>,
}

impl ResearchWorkflowBuilder {
    pub fn planner(mut self, agent: Arc<dyn StructuredAgent<ResearchPlan>>) -> Self {
        self.agents.planner = agent;
        self
    }

    pub fn gatherer(mut self, agent: Arc<dyn StructuredAgent<SearchResult>>) -> Self {
        self.agents.gatherer = agent;
        self
    }

    pub fn synthesizer(mut self, agent: Arc<dyn StructuredAgent<ResearchReport>>) -> Self {
        self.agents.synthesizer = agent;
        self
    }

    pub fn verifier(mut self, agent: Arc<dyn StructuredAgent<ValidationResult>>) -> Self {
        self.agents.verifier = agent;
        self
    }

    pub fn sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn build(self) -> ResearchWorkflow {
        ResearchWorkflow {
            agents: self.agents,
            sink: self.sink,
        }
    }
}

/// Short id tying together all log lines of one run.
pub fn new_correlation_id() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}

/// Prompt handed to the synthesizer. Results keep gathering order.
pub fn synthesis_prompt(query: &str, plan: &ResearchPlan, results: &[SearchResult]) -> String {
    let plan_json = serde_json::to_string(plan).unwrap_or_default();
    let results_json = results
        .iter()
        .map(|r| serde_json::to_string(r).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Original query: {query}\n\
         Research plan: {plan_json}\n\
         Search results: [{results_json}]\n\n\
         Create a comprehensive research report based on these materials."
    )
}

pub fn verification_prompt(report: &ResearchReport) -> String {
    let report_json = serde_json::to_string(report).unwrap_or_default();
    format!(
        "Validate this research report:\n{report_json}\n\n\
         Check for quality, consistency, and reliability."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::models::SearchStep;

    fn plan() -> ResearchPlan {
        ResearchPlan::new(
            "summary",
            vec![SearchStep::new("rust async", "learn").unwrap()],
            "be thorough",
        )
        .unwrap()
    }

    #[test]
    fn test_correlation_id_is_short() {
        let id = new_correlation_id();
        assert_eq!(id.len(), 8);
        assert_ne!(id, new_correlation_id());
    }

    #[test]
    fn test_synthesis_prompt_layout() {
        let results = vec![
            SearchResult {
                query: "a".to_string(),
                findings: vec![],
                sources: vec![],
            },
            SearchResult {
                query: "b".to_string(),
                findings: vec![],
                sources: vec![],
            },
        ];
        let prompt = synthesis_prompt("What is Rust?", &plan(), &results);
        let expected_plan = serde_json::to_string(&plan()).unwrap();
        assert!(prompt.starts_with("Original query: What is Rust?\n"));
        assert!(prompt.contains(&format!("Research plan: {expected_plan}\n")));
        assert!(prompt.contains(
            "Search results: [{\"query\":\"a\",\"findings\":[],\"sources\":[]}, {\"query\":\"b\",\"findings\":[],\"sources\":[]}]\n\n"
        ));
        assert!(prompt.ends_with("Create a comprehensive research report based on these materials."));
    }

    #[test]
    fn test_verification_prompt_layout() {
        let report = ResearchReport {
            title: "T".to_string(),
            summary: "S".to_string(),
            key_findings: vec![],
            sources: vec![],
            limitations: String::new(),
        };
        let prompt = verification_prompt(&report);
        assert_eq!(
            prompt,
            "Validate this research report:\n{\"title\":\"T\",\"summary\":\"S\",\"key_findings\":[],\"sources\":[],\"limitations\":\"\"}\n\nCheck for quality, consistency, and reliability."
        );
    }
}
