//! Demo fixtures
//!
//! A canned quantum computing run, returned by `?demo=true` so frontends can
//! be exercised without calling any model.

use serde_json::json;

use super::events::{Phase, ResearchEvent};
use super::models::{
    ModelError, PhaseTimings, ResearchPlan, ResearchReport, ResearchResult, SearchResult,
    SearchStep, ValidationResult,
};

/// Environments where demo mode may be used.
pub const DEMO_ENVIRONMENTS: &[&str] = &["development", "staging"];

pub fn is_demo_mode_allowed(environment: &str) -> bool {
    DEMO_ENVIRONMENTS.contains(&environment)
}

const EXECUTIVE_SUMMARY: &str = "Research quantum computing by exploring recent breakthroughs, practical applications, and current limitations";
const REPORT_TITLE: &str = "Recent Advances in Quantum Computing: 2024 Analysis";


fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Fixture result echoing `query`.
///
/// Built through the model constructors like any other run.
pub fn demo_research_result(query: &str) -> Result<ResearchResult, ModelError> {
    let plan = ResearchPlan::new(
        EXECUTIVE_SUMMARY,
        vec![
            SearchStep::new(
                "quantum computing breakthroughs 2024",
                "Identify recent technical advances in quantum error correction",
            )?,
            SearchStep::new(
                "quantum computing applications industry",
                "Find practical use cases and commercial implementations",
            )?,
            SearchStep::new(
                "quantum computing limitations challenges",
                "Understand current technical barriers and constraints",
            )?,
        ],
        "Focus on recent developments, emphasize practical applications, note technical limitations and challenges",
    )?;

    let search_results = vec![
        SearchResult {
            query: "quantum computing breakthroughs 2024".to_string(),
            findings: strings(&[
                "Google achieved quantum error correction breakthrough with surface code implementation",
                "IBM announced 127-qubit quantum processor with improved coherence times exceeding 100 microseconds",
                "Microsoft demonstrated topological qubits with reduced error rates",
            ]),
            sources: strings(&[
                "https://www.nature.com/articles/quantum-2024",
                "https://research.ibm.com/quantum",
                "https://www.microsoft.com/research/quantum",
            ]),
        },
        SearchResult {
            query: "quantum computing applications industry".to_string(),
            findings: strings(&[
                "Drug discovery companies using quantum simulation for molecular modeling",
                "Financial institutions applying quantum algorithms to portfolio optimization",
                "Cryptography research accelerating post-quantum encryption standards",
            ]),
            sources: strings(&[
                "https://www.pharmaceutical-technology.com/quantum",
                "https://www.jpmorgan.com/quantum-research",
                "https://www.nist.gov/quantum-cryptography",
            ]),
        },
    ];

    let report = ResearchReport {
        title: REPORT_TITLE.to_string(),
        summary: "Quantum computing achieved significant breakthroughs in 2024, with major advances in error correction and qubit scalability. Industry applications are emerging in pharmaceuticals, finance, and cryptography, though hardware costs and error rates remain barriers to widespread adoption.".to_string(),
        key_findings: strings(&[
            "Error correction techniques reduced qubit error rates by 50% using surface code implementations",
            "Commercial applications now viable in drug discovery, financial modeling, and cryptography",
            "127-qubit systems demonstrated with coherence times exceeding 100 microseconds",
            "Hardware costs remain a barrier to widespread adoption outside research institutions",
            "Post-quantum cryptography standards accelerating due to quantum threat awareness",
        ]),
        sources: search_results
            .iter()
            .flat_map(|r| r.sources.iter().cloned())
            .collect(),
        limitations: "Limited data on long-term stability of qubit systems; most sources focus on recent developments from major tech companies".to_string(),
    };

    let validation = ValidationResult::new(
        true,
        0.85,
        strings(&[
            "Limited geographic diversity in sources",
            "Primarily industry sources rather than peer-reviewed research",
        ]),
        strings(&[
            "Add more peer-reviewed academic sources",
            "Expand analysis of emerging competitors beyond IBM/Google/Microsoft",
            "Include perspectives from quantum computing startups",
        ]),
    )?;

    Ok(ResearchResult {
        query: query.to_string(),
        plan,
        search_results,
        report,
        validation,
        timings: PhaseTimings {
            planning_ms: 100,
            gathering_ms: 200,
            synthesis_ms: 150,
            verification_ms: 50,
            total_ms: 500,
        },
    })
}

/// Fixture event sequence: start and complete for each phase, then `complete`.
pub fn demo_events(query: &str) -> Result<Vec<ResearchEvent>, ModelError> {
    let result = demo_research_result(query)?;
    let total_findings: usize = result.search_results.iter().map(|r| r.findings.len()).sum();

    let phases = [
        (
            Phase::Planning,
            result.timings.planning_ms,
            json!({
                "executive_summary": result.plan.executive_summary(),
                "search_steps": result.plan.step_count(),
            }),
        ),
        (
            Phase::Gathering,
            result.timings.gathering_ms,
            json!({
                "searches_completed": result.search_results.len(),
                "total_findings": total_findings,
            }),
        ),
        (
            Phase::Synthesis,
            result.timings.synthesis_ms,
            json!({
                "title": result.report.title,
                "key_findings_count": result.report.key_findings.len(),
            }),
        ),
        (
            Phase::Verification,
            result.timings.verification_ms,
            json!({
                "is_valid": result.validation.is_valid(),
                "confidence_score": result.validation.confidence_score(),
            }),
        ),
    ];

    let mut events = Vec::with_capacity(phases.len() * 2 + 1);
    for (phase, duration_ms, output_summary) in phases {
        events.push(ResearchEvent::PhaseStart { phase });
        events.push(ResearchEvent::PhaseComplete {
            phase,
            duration_ms,
            output_summary,
        });
    }
    events.push(ResearchEvent::Complete(Box::new(result)));
    Ok(events)
}
