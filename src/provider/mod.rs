//! Language-model gateway: the provider trait and its HTTP implementations.

pub mod azure;
pub mod http;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{AppConfig, ProviderKind};
use crate::error::AgentError;
use crate::types::{AgentToolCall, FinishReason, GenerationSettings, ModelMessage, Usage};

use self::azure::AzureOpenAiProvider;
use self::openai::{OpenAiProvider, RequestOptions};

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// One assistant turn returned by a provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub text: String,
    pub tool_calls: Vec<AgentToolCall>,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}

/// Core trait implemented by all model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g. "azure_openai", "openai").
    fn provider_name(&self) -> &str;
    /// The model or deployment this instance serves.
    fn model_id(&self) -> &str;

    /// Produce one assistant turn for the given history and tools.
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, AgentError>;
}

/// Create the provider selected by `config.llm.provider`.
pub fn create_provider(config: &AppConfig) -> Result<Arc<dyn ModelProvider>, AgentError> {
    let llm = &config.llm;
    let options = RequestOptions {
        timeout: Duration::from_secs(llm.timeout_secs),
        max_retries: llm.max_retries,
    };

    let provider: Arc<dyn ModelProvider> = match llm.provider {
        ProviderKind::AzureOpenai => {
            let endpoint = llm.endpoint.as_deref().ok_or_else(|| {
                AgentError::Configuration("Missing AZURE_OPENAI_ENDPOINT".into())
            })?;
            let api_key = llm.api_key.as_deref().ok_or_else(|| {
                AgentError::Authentication("Missing AZURE_OPENAI_API_KEY".into())
            })?;
            Arc::new(AzureOpenAiProvider::new(
                endpoint,
                &llm.deployment,
                api_key,
                &llm.api_version,
                options,
            )?)
        }
        ProviderKind::Openai => {
            let api_key = llm
                .api_key
                .as_deref()
                .ok_or_else(|| AgentError::Authentication("Missing OPENAI_API_KEY".into()))?;
            Arc::new(OpenAiProvider::new(
                llm.deployment.clone(),
                api_key,
                llm.endpoint.clone(),
                options,
            )?)
        }
    };

    info!(
        provider = provider.provider_name(),
        model = provider.model_id(),
        "language model provider ready"
    );
    Ok(provider)
}

/// Generation settings derived from configuration.
pub fn generation_settings(config: &AppConfig) -> GenerationSettings {
    GenerationSettings {
        temperature: config.llm.temperature,
        max_tokens: config.llm.max_tokens,
    }
}
