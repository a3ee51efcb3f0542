//! Research pipeline data model
//!
//! Every value here is built once per run and never mutated afterwards.
//! Invariants (plan step bounds, non-empty step fields, confidence range)
//! are enforced both by the constructors and during deserialization, so a
//! model response that violates them never becomes a typed value. Types
//! carrying an invariant keep their fields private; struct literals and
//! field assignment do not compile outside this module:
//!
//! ```compile_fail
//! use deepr::research::ResearchPlan;
//!
//! let plan = ResearchPlan {
//!     executive_summary: String::new(),
//!     web_search_steps: vec![],
//!     analysis_instructions: String::new(),
//! };
//! ```
//!
//! ```compile_fail
//! use deepr::research::ValidationResult;
//!
//! let mut validation = ValidationResult::new(true, 0.5, vec![], vec![]).unwrap();
//! validation.confidence_score = 1.5;
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Minimum number of web search steps in a plan.
pub const MIN_SEARCH_STEPS: usize = 1;
/// Maximum number of web search steps in a plan.
pub const MAX_SEARCH_STEPS: usize = 5;
/// Maximum accepted query length, in characters.
pub const MAX_QUERY_CHARS: usize = 1000;

/// Violations of the data model invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error(
        "research plan must contain between {MIN_SEARCH_STEPS} and {MAX_SEARCH_STEPS} search steps, got {0}"
    )]
    StepCount(usize),

    #[error("search step '{0}' must not be empty")]
    EmptyStepField(&'static str),

    #[error("confidence score must be within [0.0, 1.0], got {0}")]
    ConfidenceOutOfRange(f64),

    #[error("query must be between 1 and {MAX_QUERY_CHARS} characters, got {0}")]
    QueryLength(usize),
}

/// Check a research query against the accepted length bounds.
pub fn validate_query(query: &str) -> Result<(), ModelError> {
    let len = query.chars().count();
    if len == 0 || len > MAX_QUERY_CHARS {
        return Err(ModelError::QueryLength(len));
    }
    Ok(())
}

// ============= Planning =============

/// A single web search step in the research plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "RawSearchStep")]
pub struct SearchStep {
    /// Search query terms to execute
    #[schema(example = "quantum computing breakthroughs 2024")]
    search_terms: String,
    /// Goal or rationale for this search step
    #[schema(example = "Identify recent technical advances in quantum error correction")]
    purpose: String,
}

#[derive(Deserialize)]
struct RawSearchStep {
    search_terms: String,
    purpose: String,
}

impl SearchStep {
    pub fn new(
        search_terms: impl Into<String>,
        purpose: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let search_terms = search_terms.into();
        let purpose = purpose.into();
        if search_terms.is_empty() {
            return Err(ModelError::EmptyStepField("search_terms"));
        }
        if purpose.is_empty() {
            return Err(ModelError::EmptyStepField("purpose"));
        }
        Ok(Self {
            search_terms,
            purpose,
        })
    }

    pub fn search_terms(&self) -> &str {
        &self.search_terms
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }
}

impl TryFrom<RawSearchStep> for SearchStep {
    type Error = ModelError;

    fn try_from(raw: RawSearchStep) -> Result<Self, Self::Error> {
        Self::new(raw.search_terms, raw.purpose)
    }
}

/// Structured research plan with 1-5 search steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "RawResearchPlan")]
pub struct ResearchPlan {
    /// High-level overview of research strategy and approach
    executive_summary: String,
    /// 1-5 targeted web searches to execute in parallel
    #[schema(min_items = 1, max_items = 5)]
    web_search_steps: Vec<SearchStep>,
    /// Guidance for the synthesis phase on how to analyze and structure findings
    analysis_instructions: String,
}

#[derive(Deserialize)]
struct RawResearchPlan {
    executive_summary: String,
    web_search_steps: Vec<SearchStep>,
    analysis_instructions: String,
}

impl ResearchPlan {
    pub fn new(
        executive_summary: impl Into<String>,
        web_search_steps: Vec<SearchStep>,
        analysis_instructions: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let count = web_search_steps.len();
        if !(MIN_SEARCH_STEPS..=MAX_SEARCH_STEPS).contains(&count) {
            return Err(ModelError::StepCount(count));
        }
        Ok(Self {
            executive_summary: executive_summary.into(),
            web_search_steps,
            analysis_instructions: analysis_instructions.into(),
        })
    }

    pub fn executive_summary(&self) -> &str {
        &self.executive_summary
    }

    pub fn web_search_steps(&self) -> &[SearchStep] {
        &self.web_search_steps
    }

    pub fn analysis_instructions(&self) -> &str {
        &self.analysis_instructions
    }

    /// Number of search steps (always within 1..=5).
    pub fn step_count(&self) -> usize {
        self.web_search_steps.len()
    }
}

impl TryFrom<RawResearchPlan> for ResearchPlan {
    type Error = ModelError;

    fn try_from(raw: RawResearchPlan) -> Result<Self, Self::Error> {
        Self::new(
            raw.executive_summary,
            raw.web_search_steps,
            raw.analysis_instructions,
        )
    }
}

// ============= Gathering =============

/// Results from one executed web search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchResult {
    /// The search query that was executed
    pub query: String,
    /// Key facts and insights discovered from this search
    #[serde(default)]
    pub findings: Vec<String>,
    /// URLs of web sources where findings were discovered
    #[serde(default)]
    pub sources: Vec<String>,
}

// ============= Synthesis =============

/// Final synthesized research report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResearchReport {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    /// Acknowledged gaps, uncertainties, or constraints in the research
    #[serde(default)]
    pub limitations: String,
}

// ============= Verification =============

/// Quality validation of a research report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "RawValidationResult")]
pub struct ValidationResult {
    /// Whether the report meets quality standards
    is_valid: bool,
    /// Quality score from 0.0 (lowest) to 1.0 (highest)
    #[schema(minimum = 0.0, maximum = 1.0, example = 0.85)]
    confidence_score: f64,
    #[serde(default)]
    issues_found: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
}

#[derive(Deserialize)]
struct RawValidationResult {
    is_valid: bool,
    confidence_score: f64,
    #[serde(default)]
    issues_found: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
}

impl ValidationResult {
    pub fn new(
        is_valid: bool,
        confidence_score: f64,
        issues_found: Vec<String>,
        recommendations: Vec<String>,
    ) -> Result<Self, ModelError> {
        // NaN fails the range check as well
        if !(0.0..=1.0).contains(&confidence_score) {
            return Err(ModelError::ConfidenceOutOfRange(confidence_score));
        }
        Ok(Self {
            is_valid,
            confidence_score,
            issues_found,
            recommendations,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Always within [0.0, 1.0].
    pub fn confidence_score(&self) -> f64 {
        self.confidence_score
    }

    pub fn issues_found(&self) -> &[String] {
        &self.issues_found
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }
}

impl TryFrom<RawValidationResult> for ValidationResult {
    type Error = ModelError;

    fn try_from(raw: RawValidationResult) -> Result<Self, Self::Error> {
        Self::new(
            raw.is_valid,
            raw.confidence_score,
            raw.issues_found,
            raw.recommendations,
        )
    }
}

// ============= Aggregate =============

/// Wall-clock duration of each phase and of the whole run, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PhaseTimings {
    pub planning_ms: u64,
    pub gathering_ms: u64,
    pub synthesis_ms: u64,
    pub verification_ms: u64,
    pub total_ms: u64,
}

impl PhaseTimings {
    /// Sum of the four phase durations.
    pub fn phases_sum(&self) -> u64 {
        self.planning_ms + self.gathering_ms + self.synthesis_ms + self.verification_ms
    }
}

/// Complete result of a research workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResearchResult {
    /// Original research question that was submitted
    #[schema(example = "What are the latest developments in quantum computing?")]
    pub query: String,
    pub plan: ResearchPlan,
    /// Search results from every search that succeeded
    pub search_results: Vec<SearchResult>,
    pub report: ResearchReport,
    pub validation: ValidationResult,
    pub timings: PhaseTimings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn steps(n: usize) -> Vec<SearchStep> {
        (0..n)
            .map(|i| SearchStep::new(format!("terms {i}"), format!("purpose {i}")).unwrap())
            .collect()
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(5)]
    fn test_plan_accepts_step_counts_in_range(#[case] n: usize) {
        let plan = ResearchPlan::new("summary", steps(n), "instructions").unwrap();
        assert_eq!(plan.step_count(), n);
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(10)]
    fn test_plan_rejects_step_counts_out_of_range(#[case] n: usize) {
        let err = ResearchPlan::new("summary", steps(n), "instructions").unwrap_err();
        assert_eq!(err, ModelError::StepCount(n));
    }

    #[test]
    fn test_plan_deserialization_enforces_step_bounds() {
        let empty = serde_json::json!({
            "executive_summary": "s",
            "web_search_steps": [],
            "analysis_instructions": "i"
        });
        assert!(serde_json::from_value::<ResearchPlan>(empty).is_err());

        let six: Vec<_> = (0..6)
            .map(|i| serde_json::json!({"search_terms": format!("q{i}"), "purpose": "p"}))
            .collect();
        let too_many = serde_json::json!({
            "executive_summary": "s",
            "web_search_steps": six,
            "analysis_instructions": "i"
        });
        assert!(serde_json::from_value::<ResearchPlan>(too_many).is_err());
    }

    #[test]
    fn test_search_step_rejects_empty_fields() {
        assert_eq!(
            SearchStep::new("", "purpose").unwrap_err(),
            ModelError::EmptyStepField("search_terms")
        );
        assert_eq!(
            SearchStep::new("terms", "").unwrap_err(),
            ModelError::EmptyStepField("purpose")
        );
        let raw = serde_json::json!({"search_terms": "", "purpose": "p"});
        assert!(serde_json::from_value::<SearchStep>(raw).is_err());
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.5)]
    #[case(1.0)]
    fn test_confidence_score_accepts_closed_range(#[case] score: f64) {
        assert!(ValidationResult::new(true, score, vec![], vec![]).is_ok());
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.1)]
    #[case(f64::NAN)]
    fn test_confidence_score_rejects_out_of_range(#[case] score: f64) {
        assert!(matches!(
            ValidationResult::new(true, score, vec![], vec![]),
            Err(ModelError::ConfidenceOutOfRange(_))
        ));
    }

    #[test]
    fn test_accessors_expose_constructed_values() {
        let plan = ResearchPlan::new("summary", steps(2), "instructions").unwrap();
        assert_eq!(plan.executive_summary(), "summary");
        assert_eq!(plan.analysis_instructions(), "instructions");
        assert_eq!(plan.web_search_steps()[1].search_terms(), "terms 1");
        assert_eq!(plan.web_search_steps()[1].purpose(), "purpose 1");

        let validation =
            ValidationResult::new(false, 0.4, vec!["gap".to_string()], vec![]).unwrap();
        assert!(!validation.is_valid());
        assert_eq!(validation.confidence_score(), 0.4);
        assert_eq!(validation.issues_found(), ["gap".to_string()]);
        assert!(validation.recommendations().is_empty());
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    fn test_constructed_values_survive_json_round_trip(#[case] score: f64) {
        let validation = ValidationResult::new(true, score, vec![], vec![]).unwrap();
        let json = serde_json::to_string(&validation).unwrap();
        assert_eq!(
            serde_json::from_str::<ValidationResult>(&json).unwrap(),
            validation
        );

        for n in [MIN_SEARCH_STEPS, MAX_SEARCH_STEPS] {
            let plan = ResearchPlan::new("s", steps(n), "i").unwrap();
            let json = serde_json::to_string(&plan).unwrap();
            assert_eq!(serde_json::from_str::<ResearchPlan>(&json).unwrap(), plan);
        }
    }

    #[test]
    fn test_validation_deserialization_rejects_bad_score() {
        let raw = serde_json::json!({"is_valid": true, "confidence_score": 1.5});
        assert!(serde_json::from_value::<ValidationResult>(raw).is_err());
    }

    #[test]
    fn test_optional_fields_default() {
        let result: SearchResult = serde_json::from_str(r#"{"query": "q"}"#).unwrap();
        assert!(result.findings.is_empty());
        assert!(result.sources.is_empty());

        let report: ResearchReport =
            serde_json::from_str(r#"{"title": "T", "summary": "S"}"#).unwrap();
        assert!(report.key_findings.is_empty());
        assert_eq!(report.limitations, "");

        let validation: ValidationResult =
            serde_json::from_str(r#"{"is_valid": false, "confidence_score": 0.2}"#).unwrap();
        assert!(validation.issues_found().is_empty());
        assert!(validation.recommendations().is_empty());
    }

    #[test]
    fn test_research_result_json_round_trip() {
        let result = ResearchResult {
            query: "What is quantum computing?".to_string(),
            plan: ResearchPlan::new("summary", steps(2), "instructions").unwrap(),
            search_results: vec![SearchResult {
                query: "terms 0".to_string(),
                findings: vec!["finding".to_string()],
                sources: vec!["https://example.com".to_string()],
            }],
            report: ResearchReport {
                title: "Title".to_string(),
                summary: "Summary".to_string(),
                key_findings: vec!["kf".to_string()],
                sources: vec!["https://example.com".to_string()],
                limitations: "few sources".to_string(),
            },
            validation: ValidationResult::new(
                true,
                0.85,
                vec!["issue".to_string()],
                vec!["rec".to_string()],
            )
            .unwrap(),
            timings: PhaseTimings {
                planning_ms: 10,
                gathering_ms: 20,
                synthesis_ms: 30,
                verification_ms: 40,
                total_ms: 105,
            },
        };

        let json = serde_json::to_string(&result).unwrap();
        let parsed: ResearchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
        assert!(parsed.timings.total_ms >= parsed.timings.phases_sum());
    }

    #[rstest]
    #[case("", false)]
    #[case("a", true)]
    #[case(&"x".repeat(1000), true)]
    #[case(&"x".repeat(1001), false)]
    #[case(&"é".repeat(1000), true)]
    fn test_validate_query_bounds(#[case] query: &str, #[case] ok: bool) {
        assert_eq!(validate_query(query).is_ok(), ok);
    }
}
