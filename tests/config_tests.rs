use std::io::Write;

use deepr::utils::toml_config::{ConfigError, LogFormat, ProviderConfig, ResearchConfig};
use rstest::rstest;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const FULL_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 9100
log_format = "json"

[providers.local]
type = "ollama"
base_url = "http://ollama:11434"

[models.fast]
provider = "local"
model = "llama3.2"
temperature = 0.3

[models.large]
provider = "local"
model = "qwen2.5:14b"
max_tokens = 4096

[agents.planner]
model = "fast"
system_prompt = "Plan carefully."

[agents.gatherer]
model = "fast"
max_results = 8

[agents.synthesizer]
model = "large"

[agents.verifier]
model = "fast"

[stream]
max_duration_secs = 120
heartbeat_interval_secs = 15
"#;

#[test]
fn test_load_full_config_from_file() {
    let file = write_config(FULL_CONFIG);
    let config = ResearchConfig::load(file.path()).unwrap();

    assert_eq!(config.bind_address(), "0.0.0.0:9100");
    assert_eq!(config.server.log_format, LogFormat::Json);
    assert_eq!(config.models["fast"].temperature, 0.3);
    assert_eq!(config.models["large"].max_tokens, 4096);
    assert_eq!(
        config.agents.planner.system_prompt.as_deref(),
        Some("Plan carefully.")
    );
    assert_eq!(config.agents.gatherer.max_results, 8);
    assert!(matches!(
        &config.providers["local"],
        ProviderConfig::Ollama { base_url, .. } if base_url == "http://ollama:11434"
    ));

    let stream = config.stream_config();
    assert_eq!(stream.max_duration.as_secs(), 120);
    assert_eq!(stream.heartbeat_interval.as_secs(), 15);
    assert_eq!(stream.queue_capacity, 100);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = ResearchConfig::load(dir.path().join("deepr.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let file = write_config("[server\nport = 1");
    assert!(matches!(
        ResearchConfig::load(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}

#[rstest]
#[case::agent_names_unknown_model(
    r#"
[providers.local]
type = "ollama"

[models.default]
provider = "local"
model = "llama3.2"

[agents.verifier]
model = "missing"
"#,
    "Model 'missing' referenced by agent 'verifier' does not exist"
)]
#[case::model_names_unknown_provider(
    r#"
[models.default]
provider = "nowhere"
model = "llama3.2"
"#,
    "Provider 'nowhere' referenced by model 'default' does not exist"
)]
#[case::unset_api_key(
    r#"
[providers.cloud]
type = "openai"
api_key_env = "DEEPR_TEST_KEY_THAT_IS_NEVER_SET"

[models.default]
provider = "cloud"
model = "gpt-4o-mini"
"#,
    "Environment variable 'DEEPR_TEST_KEY_THAT_IS_NEVER_SET' referenced in config is not set"
)]
fn test_reference_validation(#[case] content: &str, #[case] message: &str) {
    let file = write_config(content);
    let err = ResearchConfig::load(file.path()).unwrap_err();
    assert_eq!(err.to_string(), message);
}
