//! Tests for layered configuration loading.

use std::io::Write;

use pretty_assertions::assert_eq;

use graph_agent::config::{AppConfig, LoadOptions, LogFormat, ProviderKind};
use graph_agent::error::AgentError;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn file_values_override_defaults() {
    let file = write_config(
        r#"
[llm]
endpoint = "https://res.openai.azure.com"
deployment = "gpt-4o-mini"
temperature = 0.2

[agent]
max_steps = 10
system_prompt = "Be concise."

[logging]
format = "json"
"#,
    );

    let config = AppConfig::load(LoadOptions {
        config_path: Some(file.path().to_path_buf()),
        ignore_env: true,
    })
    .unwrap();

    assert_eq!(config.llm.deployment, "gpt-4o-mini");
    assert_eq!(config.llm.temperature, Some(0.2));
    assert_eq!(config.llm.api_version, "2024-10-21");
    assert_eq!(config.agent.max_steps, 10);
    assert_eq!(config.agent.system_prompt.as_deref(), Some("Be concise."));
    assert_eq!(config.agent.default_timezone, "UTC");
    assert_eq!(config.server.bind_address, "0.0.0.0:8000");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn environment_overrides_file() {
    let file = write_config(
        r#"
[llm]
deployment = "from-file"

[server]
bind_address = "127.0.0.1:9000"
"#,
    );
    let mut config = AppConfig::from_file(file.path()).unwrap();

    config
        .apply_env(|key| match key {
            "AZURE_OPENAI_MODEL_CHAT" => Some("from-env".to_string()),
            "BIND_ADDRESS" => Some("127.0.0.1:9100".to_string()),
            "LOG_FORMAT" => Some("pretty".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.llm.deployment, "from-env");
    assert_eq!(config.server.bind_address, "127.0.0.1:9100");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn blank_environment_values_are_ignored() {
    let mut config = AppConfig::default();
    config
        .apply_env(|key| (key == "AZURE_OPENAI_API_VERSION").then(|| "  ".to_string()))
        .unwrap();
    assert_eq!(config.llm.api_version, "2024-10-21");
}

#[test]
fn provider_name_in_file_is_parsed() {
    let config = AppConfig::from_toml("[llm]\nprovider = \"openai\"\n").unwrap();
    assert_eq!(config.llm.provider, ProviderKind::Openai);
}

#[test]
fn unknown_provider_in_file_is_rejected() {
    let err = AppConfig::from_toml("[llm]\nprovider = \"bedrock\"\n").unwrap_err();
    assert!(matches!(err, AgentError::Configuration(_)));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AppConfig::load(LoadOptions {
        config_path: Some(dir.path().join("absent.toml")),
        ignore_env: true,
    })
    .unwrap_err();
    assert!(err.to_string().contains("cannot read"));
}

#[test]
fn invalid_values_fail_validation_on_load() {
    let file = write_config("[agent]\nmax_steps = 0\n");
    let err = AppConfig::load(LoadOptions {
        config_path: Some(file.path().to_path_buf()),
        ignore_env: true,
    })
    .unwrap_err();
    assert!(err.to_string().contains("max_steps"));
}
