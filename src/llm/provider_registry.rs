//! Provider Registry for managing multiple LLM providers
//!
//! Holds the named providers and models from `deepr.toml` and resolves the
//! model -> provider chain when an agent asks for a client.

use crate::llm::client::{LLMClient, Provider};
use crate::types::{AppError, Result};
use crate::utils::toml_config::{ModelConfig, ProviderConfig, ResearchConfig};
use std::collections::HashMap;

/// Registry for managing multiple named LLM providers
pub struct ProviderRegistry {
    /// Provider configurations keyed by name
    providers: HashMap<String, ProviderConfig>,
    /// Model configurations keyed by name
    models: HashMap<String, ModelConfig>,
}

impl ProviderRegistry {
    /// Create a new empty provider registry
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            models: HashMap::new(),
        }
    }

    /// Create a provider registry from TOML configuration
    pub fn from_config(config: &ResearchConfig) -> Self {
        Self {
            providers: config.providers.clone(),
            models: config.models.clone(),
        }
    }

    pub fn register_provider(&mut self, name: &str, config: ProviderConfig) {
        self.providers.insert(name.to_string(), config);
    }

    pub fn register_model(&mut self, name: &str, config: ModelConfig) {
        self.models.insert(name.to_string(), config);
    }

    pub fn get_model(&self, name: &str) -> Option<&ModelConfig> {
        self.models.get(name)
    }

    /// Get all model names
    pub fn model_names(&self) -> Vec<&str> {
        self.models.keys().map(|s| s.as_str()).collect()
    }

    /// Resolve a model by name to its provider settings.
    pub fn resolve(&self, model_name: &str) -> Result<Provider> {
        let model_config = self.get_model(model_name).ok_or_else(|| {
            AppError::Configuration(format!("Model '{}' not found in configuration", model_name))
        })?;

        let provider_config = self.providers.get(&model_config.provider).ok_or_else(|| {
            AppError::Configuration(format!(
                "Provider '{}' referenced by model '{}' not found",
                model_config.provider, model_name
            ))
        })?;

        Provider::from_config(model_config, provider_config)
    }

    /// Create an LLM client for a specific model by name
    pub async fn create_client_for_model(&self, model_name: &str) -> Result<Box<dyn LLMClient>> {
        self.resolve(model_name)?.create_client().await
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        registry.register_provider(
            "local",
            ProviderConfig::Ollama {
                base_url: "http://localhost:11434".to_string(),
                default_model: None,
            },
        );
        registry.register_model(
            "fast",
            ModelConfig {
                provider: "local".to_string(),
                model: "llama3.2".to_string(),
                temperature: 0.7,
                max_tokens: 512,
            },
        );
        registry.register_model(
            "orphan",
            ModelConfig {
                provider: "missing".to_string(),
                model: "x".to_string(),
                temperature: 0.7,
                max_tokens: 512,
            },
        );
        registry
    }

    #[test]
    fn test_resolve_model_chain() {
        let provider = registry().resolve("fast").unwrap();
        assert_eq!(provider.name(), "Ollama");
        assert_eq!(provider.model(), "llama3.2");
    }

    #[test]
    fn test_resolve_unknown_model() {
        let err = registry().resolve("nope").unwrap_err();
        assert!(err.to_string().contains("Model 'nope' not found"));
    }

    #[test]
    fn test_resolve_missing_provider() {
        let err = registry().resolve("orphan").unwrap_err();
        assert!(err.to_string().contains("Provider 'missing'"));
    }
}
