//! Agent Registry for the research roles
//!
//! Builds the four default agents once at startup from `[agents.*]` and
//! hands out shared handles. Roles that name the same model share one LLM
//! client.

use std::collections::HashMap;
use std::sync::Arc;

use crate::agents::prompts::{GATHERER_PROMPT, PLANNER_PROMPT, SYNTHESIZER_PROMPT, VERIFIER_PROMPT};
use crate::agents::{LlmAgent, WebSearchAgent};
use crate::llm::{LLMClient, ProviderRegistry};
use crate::research::models::{ResearchPlan, ResearchReport, ValidationResult};
use crate::research::workflow::ResearchAgents;
use crate::tools::search::{DuckDuckGoSearch, WebSearch};
use crate::types::Result;
use crate::utils::toml_config::ResearchConfig;

/// Shared default agents for every workflow run.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: ResearchAgents,
}

impl AgentRegistry {
    pub fn new(agents: ResearchAgents) -> Self {
        Self { agents }
    }

    /// Create the default agents from configuration, searching with DuckDuckGo.
    pub async fn from_config(config: &ResearchConfig) -> Result<Self> {
        Self::from_config_with_search(config, Arc::new(DuckDuckGoSearch::new())).await
    }

    pub async fn from_config_with_search(
        config: &ResearchConfig,
        search: Arc<dyn WebSearch>,
    ) -> Result<Self> {
        let providers = ProviderRegistry::from_config(config);
        let mut clients = ClientCache::new(&providers);
        let roles = &config.agents;

        let planner = LlmAgent::<ResearchPlan>::new(
            "planner",
            prompt_or(&roles.planner.system_prompt, PLANNER_PROMPT),
            clients.get(&roles.planner.model).await?,
        );
        let gatherer = WebSearchAgent::new(
            search,
            clients.get(&roles.gatherer.model).await?,
            prompt_or(&roles.gatherer.system_prompt, GATHERER_PROMPT),
            roles.gatherer.max_results,
        );
        let synthesizer = LlmAgent::<ResearchReport>::new(
            "synthesizer",
            prompt_or(&roles.synthesizer.system_prompt, SYNTHESIZER_PROMPT),
            clients.get(&roles.synthesizer.model).await?,
        );
        let verifier = LlmAgent::<ValidationResult>::new(
            "verifier",
            prompt_or(&roles.verifier.system_prompt, VERIFIER_PROMPT),
            clients.get(&roles.verifier.model).await?,
        );

        tracing::info!(
            planner = %roles.planner.model,
            gatherer = %roles.gatherer.model,
            synthesizer = %roles.synthesizer.model,
            verifier = %roles.verifier.model,
            "research agents initialized"
        );

        Ok(Self::new(ResearchAgents {
            planner: Arc::new(planner),
            gatherer: Arc::new(gatherer),
            synthesizer: Arc::new(synthesizer),
            verifier: Arc::new(verifier),
        }))
    }

    /// Shared handles to the default agents.
    pub fn agents(&self) -> ResearchAgents {
        self.agents.clone()
    }
}

fn prompt_or(configured: &Option<String>, default: &str) -> String {
    configured
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(default)
        .to_string()
}

/// One client per configured model name.
struct ClientCache<'a> {
    providers: &'a ProviderRegistry,
    clients: HashMap<String, Arc<dyn LLMClient>>,
}

impl<'a> ClientCache<'a> {
    fn new(providers: &'a ProviderRegistry) -> Self {
        Self {
            providers,
            clients: HashMap::new(),
        }
    }

    async fn get(&mut self, model_name: &str) -> Result<Arc<dyn LLMClient>> {
        if let Some(client) = self.clients.get(model_name) {
            return Ok(Arc::clone(client));
        }
        let client: Arc<dyn LLMClient> =
            Arc::from(self.providers.create_client_for_model(model_name).await?);
        self.clients
            .insert(model_name.to_string(), Arc::clone(&client));
        Ok(client)
    }
}
