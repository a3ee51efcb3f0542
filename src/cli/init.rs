//! Init command implementation
//!
//! Writes a starter `deepr.toml`, `.env.example` and `.gitignore`.

use super::output::Output;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug, PartialEq)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// deepr.toml already exists and `force` was not set
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// LLM provider to configure (ollama or openai)
    pub provider: String,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing deepr");

    let base_path = &config.path;
    if let Err(e) = fs::create_dir_all(base_path) {
        output.error(&format!("Failed to create {}: {}", base_path.display(), e));
        return InitResult::Error(e.to_string());
    }

    let config_path = base_path.join("deepr.toml");
    if config_path.exists() && !config.force {
        output.warning("deepr.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    output.subheader("Creating configuration files");

    if let Err(e) = write_file(&config_path, &generate_deepr_toml(&config), true) {
        output.error(&format!("Failed to create deepr.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", "deepr.toml");

    let env_example_path = base_path.join(".env.example");
    match write_file(&env_example_path, &generate_env_example(), config.force) {
        Ok(true) => output.created("env", ".env.example"),
        Ok(false) => output.skipped(".env.example", "already exists"),
        Err(e) => {
            output.error(&format!("Failed to create .env.example: {}", e));
            return InitResult::Error(e.to_string());
        }
    }

    let gitignore_path = base_path.join(".gitignore");
    match write_file(&gitignore_path, &generate_gitignore(), false) {
        Ok(true) => output.created("file", ".gitignore"),
        Ok(false) => output.skipped(".gitignore", "already exists"),
        Err(e) => output.warning(&format!("Failed to create .gitignore: {}", e)),
    }

    output.complete("deepr initialized successfully!");

    output.header("Next Steps");
    output.newline();
    if config.provider == "openai" {
        output.info("1. Set your API key:");
        output.command("cp .env.example .env");
        output.command("# Edit .env and set OPENAI_API_KEY");
    } else {
        output.info("1. Start Ollama (if not running):");
        output.command("ollama serve");
        output.command("ollama pull llama3.2");
    }
    output.newline();

    output.info("2. Start the server:");
    output.command("deepr-server");
    output.newline();

    output.hint(&format!(
        "Server will be available at http://{}:{}",
        config.host, config.port
    ));
    output.hint("Try it without a model: POST /research?demo=true");

    InitResult::Success
}

/// Returns whether the file was written.
fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    fs::write(path, content)?;
    Ok(true)
}

fn generate_deepr_toml(config: &InitConfig) -> String {
    let (provider_section, provider_name, model) = if config.provider == "openai" {
        (
            r#"# OpenAI API (set OPENAI_API_KEY in .env)
[providers.openai]
type = "openai"
api_key_env = "OPENAI_API_KEY"
api_base = "https://api.openai.com/v1"
"#,
            "openai",
            "gpt-4o-mini",
        )
    } else {
        (
            r#"# Ollama - Local inference (no API key required)
[providers.ollama-local]
type = "ollama"
base_url = "http://localhost:11434"
"#,
            "ollama-local",
            "llama3.2",
        )
    };

    format!(
        r#"# deepr configuration

[server]
host = "{host}"
port = {port}
log_level = "info"
# "pretty" or "json"
log_format = "pretty"
# Demo mode (?demo=true) is only allowed in development and staging
environment = "development"

# ============= Providers =============

{provider_section}
# ============= Models =============

[models.default]
provider = "{provider_name}"
model = "{model}"
temperature = 0.7
max_tokens = 2048

# Lower temperature for planning and verification
[models.precise]
provider = "{provider_name}"
model = "{model}"
temperature = 0.2
max_tokens = 2048

# ============= Research agents =============
# Each role names a model above. Set system_prompt to override the built-in prompt.

[agents.planner]
model = "precise"

[agents.gatherer]
model = "default"
max_results = 5

[agents.synthesizer]
model = "default"

[agents.verifier]
model = "precise"

# ============= Streaming =============

[stream]
queue_capacity = 100
publish_timeout_secs = 5
heartbeat_interval_secs = 30
max_duration_secs = 600
poll_interval_ms = 100
cleanup_timeout_secs = 10
"#,
        host = config.host,
        port = config.port,
    )
}

fn generate_env_example() -> String {
    r#"# deepr environment variables
# Copy to .env and fill in the values you need

# Required when an openai provider is configured
OPENAI_API_KEY=

# Overrides server.environment (development, staging, production)
# ENVIRONMENT=production

# Log filter, overrides server.log_level
# RUST_LOG=deepr=debug,tower_http=info
"#
    .to_string()
}

fn generate_gitignore() -> String {
    r#"# Environment
.env

# Build output
/target
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::toml_config::{ProviderConfig, ResearchConfig};
    use tempfile::TempDir;

    fn init_config(temp_dir: &TempDir, provider: &str) -> InitConfig {
        InitConfig {
            path: temp_dir.path().to_path_buf(),
            force: false,
            provider: provider.to_string(),
            host: "127.0.0.1".to_string(),
            port: 8100,
        }
    }

    #[test]
    fn test_generated_ollama_config_is_valid() {
        let temp_dir = TempDir::new().unwrap();
        let toml = generate_deepr_toml(&init_config(&temp_dir, "ollama"));

        let config = ResearchConfig::from_toml(&toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.server.port, 8100);
        assert_eq!(config.agents.planner.model, "precise");
        assert!(matches!(
            config.providers.get("ollama-local"),
            Some(ProviderConfig::Ollama { .. })
        ));
    }

    #[test]
    fn test_generated_openai_config_parses() {
        let temp_dir = TempDir::new().unwrap();
        let toml = generate_deepr_toml(&init_config(&temp_dir, "openai"));

        let config = ResearchConfig::from_toml(&toml).unwrap();
        assert_eq!(config.models["default"].provider, "openai");
        assert!(matches!(
            config.providers.get("openai"),
            Some(ProviderConfig::OpenAI { api_key_env, .. }) if api_key_env == "OPENAI_API_KEY"
        ));
    }

    #[test]
    fn test_init_writes_files_and_refuses_second_run() {
        let temp_dir = TempDir::new().unwrap();
        let output = Output::no_color();

        assert_eq!(run(init_config(&temp_dir, "ollama"), &output), InitResult::Success);
        assert!(temp_dir.path().join("deepr.toml").exists());
        assert!(temp_dir.path().join(".env.example").exists());
        assert!(temp_dir.path().join(".gitignore").exists());

        assert_eq!(
            run(init_config(&temp_dir, "ollama"), &output),
            InitResult::AlreadyExists
        );

        let mut forced = init_config(&temp_dir, "openai");
        forced.force = true;
        assert_eq!(run(forced, &output), InitResult::Success);
        let written = fs::read_to_string(temp_dir.path().join("deepr.toml")).unwrap();
        assert!(written.contains("[providers.openai]"));
    }

    #[test]
    fn test_existing_gitignore_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".gitignore"), "custom\n").unwrap();

        run(init_config(&temp_dir, "ollama"), &Output::no_color());
        let gitignore = fs::read_to_string(temp_dir.path().join(".gitignore")).unwrap();
        assert_eq!(gitignore, "custom\n");
    }
}
