//! Configuration system (layered: defaults < TOML file < environment < CLI).
//!
//! Loaded once at startup and never mutated during a run.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::error::AgentError;

const DEFAULT_AZURE_API_VERSION: &str = "2024-10-21";
const DEFAULT_DEPLOYMENT: &str = "gpt-4o";
const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_MAX_STEPS: usize = 25;
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Which chat-completion backend the gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProviderKind {
    AzureOpenai,
    Openai,
}

/// Language-model gateway settings.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    /// Azure resource endpoint, or an OpenAI-compatible base URL.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub api_version: String,
    /// Azure deployment name, or the model id for OpenAI.
    pub deployment: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::AzureOpenai,
            endpoint: None,
            api_key: None,
            api_version: DEFAULT_AZURE_API_VERSION.to_string(),
            deployment: DEFAULT_DEPLOYMENT.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: None,
            timeout_secs: 120,
            max_retries: 3,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("api_version", &self.api_version)
            .field("deployment", &self.deployment)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Orchestrator settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentSettings {
    /// Upper bound on graph node visits per run.
    pub max_steps: usize,
    /// Timezone used by `current_time` when the model omits one.
    pub default_timezone: String,
    pub system_prompt: Option<String>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            default_timezone: "UTC".to_string(),
            system_prompt: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub agent: AgentSettings,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Where to look for configuration.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit TOML file. Must exist when given.
    pub config_path: Option<PathBuf>,
    /// Skip `.env` and process environment (tests).
    pub ignore_env: bool,
}

impl AppConfig {
    /// Load defaults, then the TOML file, then the environment, then validate.
    pub fn load(options: LoadOptions) -> Result<Self, AgentError> {
        let mut config = match options.config_path {
            Some(path) => Self::from_file(&path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        if !options.ignore_env {
            let _ = dotenvy::dotenv(); // load .env if present, ignore error
            config.apply_env(|key| std::env::var(key).ok())?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file; missing sections fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self, AgentError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AgentError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "loading config file");
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, AgentError> {
        toml::from_str(raw).map_err(|e| AgentError::Configuration(format!("invalid TOML: {e}")))
    }

    /// Overlay environment values using `lookup` to read each key.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), AgentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("LLM_PROVIDER") {
            self.llm.provider = v
                .parse()
                .map_err(|_| AgentError::Configuration(format!("Unknown provider: {v}")))?;
        }

        match self.llm.provider {
            ProviderKind::AzureOpenai => {
                if let Some(v) = get("AZURE_OPENAI_ENDPOINT") {
                    self.llm.endpoint = Some(v);
                }
                if let Some(v) = get("AZURE_OPENAI_API_KEY") {
                    self.llm.api_key = Some(v);
                }
                if let Some(v) = get("AZURE_OPENAI_API_VERSION") {
                    self.llm.api_version = v;
                }
                if let Some(v) = get("AZURE_OPENAI_MODEL_CHAT") {
                    self.llm.deployment = v;
                }
            }
            ProviderKind::Openai => {
                if let Some(v) = get("OPENAI_BASE_URL") {
                    self.llm.endpoint = Some(v);
                }
                if let Some(v) = get("OPENAI_API_KEY") {
                    self.llm.api_key = Some(v);
                }
                if let Some(v) = get("OPENAI_MODEL") {
                    self.llm.deployment = v;
                }
            }
        }

        if let Some(v) = get("LLM_TEMPERATURE") {
            self.llm.temperature = Some(parse_env("LLM_TEMPERATURE", &v)?);
        }
        if let Some(v) = get("LLM_MAX_TOKENS") {
            self.llm.max_tokens = Some(parse_env("LLM_MAX_TOKENS", &v)?);
        }
        if let Some(v) = get("LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_env("LLM_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("LLM_MAX_RETRIES") {
            self.llm.max_retries = parse_env("LLM_MAX_RETRIES", &v)?;
        }
        if let Some(v) = get("AGENT_MAX_STEPS") {
            self.agent.max_steps = parse_env("AGENT_MAX_STEPS", &v)?;
        }
        if let Some(v) = get("AGENT_DEFAULT_TIMEZONE") {
            self.agent.default_timezone = v;
        }
        if let Some(v) = get("AGENT_SYSTEM_PROMPT") {
            self.agent.system_prompt = Some(v);
        }
        if let Some(v) = get("BIND_ADDRESS") {
            self.server.bind_address = v;
        }
        if let Some(v) = get("LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = get("LOG_FORMAT") {
            self.logging.format = v
                .parse()
                .map_err(|_| AgentError::Configuration(format!("invalid LOG_FORMAT '{v}'")))?;
        }
        Ok(())
    }

    /// Reject values the orchestrator cannot run with.
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.agent.max_steps == 0 {
            return Err(AgentError::Configuration(
                "agent.max_steps must be at least 1".into(),
            ));
        }
        if let Some(t) = self.llm.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(AgentError::Configuration(format!(
                    "llm.temperature must be within 0.0..=2.0, got {t}"
                )));
            }
        }
        if self.llm.deployment.trim().is_empty() {
            return Err(AgentError::Configuration("llm.deployment must not be empty".into()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(AgentError::Configuration("llm.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, AgentError> {
    value
        .trim()
        .parse()
        .map_err(|_| AgentError::Configuration(format!("invalid value for {key}: '{value}'")))
}

/// `<config dir>/graph-agent/config.toml` for the current user.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "graph-agent")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
