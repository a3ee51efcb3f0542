//! TOML-based configuration for deepr
//!
//! Providers, models, research agent roles and streaming limits are declared
//! in `deepr.toml`. Agents reference models by name and models reference
//! providers by name; [`ResearchConfig::validate`] checks the whole chain.
//!
//! ```toml
//! [server]
//! port = 8000
//! environment = "development"
//!
//! [providers.ollama-local]
//! type = "ollama"
//! base_url = "http://localhost:11434"
//!
//! [models.default]
//! provider = "ollama-local"
//! model = "llama3.2"
//!
//! [agents.planner]
//! model = "default"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::research::stream::StreamConfig;

/// Environment variable overriding `server.environment`.
pub const ENVIRONMENT_ENV: &str = "ENVIRONMENT";

/// Root configuration structure loaded from deepr.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Named LLM provider configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Named model configurations that reference providers
    #[serde(default)]
    pub models: HashMap<String, ModelConfig>,

    /// Model assignment per research role
    #[serde(default)]
    pub agents: AgentsConfig,

    #[serde(default)]
    pub stream: StreamSettings,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Deployment environment; demo mode is limited to development and staging
    #[serde(default = "default_environment")]
    pub environment: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            environment: default_environment(),
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default)]
        default_model: Option<String>,
    },
    OpenAI {
        /// Environment variable containing API key
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        #[serde(default)]
        default_model: Option<String>,
    },
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

// ============= Model Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Reference to a provider name defined in [providers]
    pub provider: String,

    /// Model name/identifier to use with the provider
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_model_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_model_max_tokens() -> u32 {
    2048
}

// ============= Agent Configuration =============

/// One entry per pipeline role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default)]
    pub planner: RoleConfig,
    #[serde(default)]
    pub gatherer: GathererConfig,
    #[serde(default)]
    pub synthesizer: RoleConfig,
    #[serde(default)]
    pub verifier: RoleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Reference to a model name defined in [models]
    #[serde(default = "default_model_ref")]
    pub model: String,

    /// Replaces the built-in role prompt
    #[serde(default)]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GathererConfig {
    #[serde(default = "default_model_ref")]
    pub model: String,

    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Web search hits fetched per search step
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_model_ref() -> String {
    "default".to_string()
}

fn default_max_results() -> usize {
    5
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            model: default_model_ref(),
            system_prompt: None,
        }
    }
}

impl Default for GathererConfig {
    fn default() -> Self {
        Self {
            model: default_model_ref(),
            system_prompt: None,
            max_results: default_max_results(),
        }
    }
}

impl AgentsConfig {
    /// (role, model reference) pairs, in pipeline order.
    pub fn model_refs(&self) -> [(&'static str, &str); 4] {
        [
            ("planner", self.planner.model.as_str()),
            ("gatherer", self.gatherer.model.as_str()),
            ("synthesizer", self.synthesizer.model.as_str()),
            ("verifier", self.verifier.model.as_str()),
        ]
    }
}

// ============= Stream Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSettings {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    #[serde(default = "default_publish_timeout_secs")]
    pub publish_timeout_secs: u64,

    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,

    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_cleanup_timeout_secs")]
    pub cleanup_timeout_secs: u64,
}

fn default_queue_capacity() -> usize {
    100
}

fn default_publish_timeout_secs() -> u64 {
    5
}

fn default_heartbeat_interval_secs() -> u64 {
    30
}

fn default_max_duration_secs() -> u64 {
    600
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_cleanup_timeout_secs() -> u64 {
    10
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            publish_timeout_secs: default_publish_timeout_secs(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            max_duration_secs: default_max_duration_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            cleanup_timeout_secs: default_cleanup_timeout_secs(),
        }
    }
}

impl StreamSettings {
    pub fn to_stream_config(&self) -> StreamConfig {
        StreamConfig {
            queue_capacity: self.queue_capacity,
            publish_timeout: Duration::from_secs(self.publish_timeout_secs),
            heartbeat_interval: Duration::from_secs(self.heartbeat_interval_secs),
            max_duration: Duration::from_secs(self.max_duration_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            cleanup_timeout: Duration::from_secs(self.cleanup_timeout_secs),
        }
    }
}

// ============= Configuration Errors =============

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Provider '{0}' referenced by model '{1}' does not exist")]
    MissingProvider(String, String),

    #[error("Model '{0}' referenced by agent '{1}' does not exist")]
    MissingModel(String, String),
}

impl Default for ResearchConfig {
    /// A single local Ollama model serving every role.
    fn default() -> Self {
        let mut providers = HashMap::new();
        providers.insert(
            "ollama-local".to_string(),
            ProviderConfig::Ollama {
                base_url: default_ollama_url(),
                default_model: Some("llama3.2".to_string()),
            },
        );

        let mut models = HashMap::new();
        models.insert(
            default_model_ref(),
            ModelConfig {
                provider: "ollama-local".to_string(),
                model: "llama3.2".to_string(),
                temperature: default_temperature(),
                max_tokens: default_model_max_tokens(),
            },
        );

        Self {
            server: ServerConfig::default(),
            providers,
            models,
            agents: AgentsConfig::default(),
            stream: StreamSettings::default(),
        }
    }
}

impl ResearchConfig {
    /// Load configuration from a TOML file
    ///
    /// The `ENVIRONMENT` variable, when set, overrides `server.environment`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;

        // Validate the configuration
        config.validate()?;

        Ok(config)
    }

    /// Parse without validating references.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: ResearchConfig = toml::from_str(content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(environment) = std::env::var(ENVIRONMENT_ENV) {
            if !environment.is_empty() {
                self.server.environment = environment;
            }
        }
    }

    /// Validate the configuration for internal consistency and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate provider env vars
        for provider in self.providers.values() {
            match provider {
                ProviderConfig::OpenAI { api_key_env, .. } => {
                    self.validate_env_var(api_key_env)?;
                }
                ProviderConfig::Ollama { .. } => {}
            }
        }

        // Validate model -> provider references
        for (model_name, model_config) in &self.models {
            if !self.providers.contains_key(&model_config.provider) {
                return Err(ConfigError::MissingProvider(
                    model_config.provider.clone(),
                    model_name.clone(),
                ));
            }
            if !(0.0..=2.0).contains(&model_config.temperature) {
                return Err(ConfigError::ValidationError(format!(
                    "temperature for model '{}' must be within [0.0, 2.0]",
                    model_name
                )));
            }
        }

        // Validate agent -> model references
        for (role, model) in self.agents.model_refs() {
            if !self.models.contains_key(model) {
                return Err(ConfigError::MissingModel(
                    model.to_string(),
                    role.to_string(),
                ));
            }
        }

        if self.agents.gatherer.max_results == 0 {
            return Err(ConfigError::ValidationError(
                "agents.gatherer.max_results must be at least 1".to_string(),
            ));
        }

        let stream = &self.stream;
        if stream.queue_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "stream.queue_capacity must be at least 1".to_string(),
            ));
        }
        if stream.poll_interval_ms == 0 || stream.heartbeat_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "stream.poll_interval_ms and stream.heartbeat_interval_secs must be positive"
                    .to_string(),
            ));
        }

        Ok(())
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        Ok(())
    }

    pub fn stream_config(&self) -> StreamConfig {
        self.stream.to_stream_config()
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
