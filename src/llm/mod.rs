//! LLM Provider Clients and Abstractions
//!
//! Every research agent talks to a model through [`LLMClient`]. Providers
//! are configured by name in `deepr.toml` and resolved through the
//! [`ProviderRegistry`].
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `ollama` - Local Ollama server (default)
//! - `openai` - OpenAI API and compatible endpoints
//!
//! # Example
//!
//! ```ignore
//! use deepr::llm::ProviderRegistry;
//!
//! let registry = ProviderRegistry::from_config(&config);
//! let client = registry.create_client_for_model("default").await?;
//!
//! let response = client.generate("What is 2+2?").await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// Registry resolving configured model names to clients.
pub mod provider_registry;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

pub use client::{GenerationParams, LLMClient, Provider};
pub use provider_registry::ProviderRegistry;
