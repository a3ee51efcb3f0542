use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::llm::LLMClient;

use super::{AgentError, StructuredAgent};

/// Asks the model for a JSON object and deserializes it into `T`.
///
/// Validated types (`ResearchPlan`, `ValidationResult`, ...) reject output
/// that breaks their invariants, which surfaces as
/// [`AgentError::InvalidOutput`].
pub struct LlmAgent<T> {
    name: String,
    system_prompt: String,
    llm: Arc<dyn LLMClient>,
    _output: PhantomData<fn() -> T>,
}

impl<T> LlmAgent<T> {
    pub fn new(
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        llm: Arc<dyn LLMClient>,
    ) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            llm,
            _output: PhantomData,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

#[async_trait]
impl<T> StructuredAgent<T> for LlmAgent<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn run(&self, input: &str) -> Result<T, AgentError> {
        let reply = self.llm.generate_with_system(&self.system_prompt, input).await?;
        tracing::debug!(
            agent = %self.name,
            model = self.llm.model_name(),
            reply_len = reply.len(),
            "agent reply received"
        );
        parse_structured(&reply)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The outermost `{ ... }` span of a model reply.
///
/// Tolerates markdown fences and chatter around the object.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, AgentError> {
    let json = extract_json(text)
        .ok_or_else(|| AgentError::InvalidOutput("no JSON object in model reply".to_string()))?;
    serde_json::from_str(json).map_err(|e| AgentError::InvalidOutput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::models::{ResearchPlan, ValidationResult};
    use crate::types::{AppError, Result};

    /// Replies with a fixed text, or fails when `reply` is `None`.
    struct ScriptedLlm {
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl LLMClient for ScriptedLlm {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.generate_with_system("", prompt).await
        }

        async fn generate_with_system(&self, _system: &str, _prompt: &str) -> Result<String> {
            self.reply
                .map(str::to_string)
                .ok_or_else(|| AppError::LLM("connection refused".to_string()))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn mock_replying(reply: &'static str) -> ScriptedLlm {
        ScriptedLlm { reply: Some(reply) }
    }

    #[test]
    fn test_extract_json_from_fenced_reply() {
        let reply = "Here is the plan:\n```json\n{\"a\": {\"b\": 1}}\n```\nDone.";
        assert_eq!(extract_json(reply), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }

    #[tokio::test]
    async fn test_agent_parses_valid_plan() {
        let llm = mock_replying(
            r#"```json
{"executive_summary": "s", "web_search_steps": [{"search_terms": "rust", "purpose": "learn"}], "analysis_instructions": "i"}
```"#,
        );
        let agent: LlmAgent<ResearchPlan> = LlmAgent::new("planner", "plan it", Arc::new(llm));
        let plan = agent.run("What is Rust?").await.unwrap();
        assert_eq!(plan.step_count(), 1);
        assert_eq!(agent.name(), "planner");
    }

    #[tokio::test]
    async fn test_agent_rejects_plan_with_too_many_steps() {
        let llm = mock_replying(
            r#"{"executive_summary": "s", "web_search_steps": [
                {"search_terms": "1", "purpose": "p"}, {"search_terms": "2", "purpose": "p"},
                {"search_terms": "3", "purpose": "p"}, {"search_terms": "4", "purpose": "p"},
                {"search_terms": "5", "purpose": "p"}, {"search_terms": "6", "purpose": "p"}
            ], "analysis_instructions": "i"}"#,
        );
        let agent: LlmAgent<ResearchPlan> = LlmAgent::new("planner", "plan it", Arc::new(llm));
        assert!(matches!(
            agent.run("q").await,
            Err(AgentError::InvalidOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_agent_rejects_out_of_range_confidence() {
        let llm = mock_replying(r#"{"is_valid": true, "confidence_score": 7}"#);
        let agent: LlmAgent<ValidationResult> = LlmAgent::new("verifier", "check", Arc::new(llm));
        assert!(matches!(
            agent.run("report").await,
            Err(AgentError::InvalidOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_llm_failure_maps_to_agent_error() {
        let llm = ScriptedLlm { reply: None };
        let agent: LlmAgent<ValidationResult> = LlmAgent::new("verifier", "check", Arc::new(llm));
        match agent.run("report").await {
            Err(AgentError::Llm(msg)) => assert!(msg.contains("connection refused")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
