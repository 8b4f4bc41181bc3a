//! Azure OpenAI provider.

use async_trait::async_trait;

use crate::error::AgentError;

use super::http::azure_headers;
use super::openai::{OpenAiProvider, RequestOptions};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

/// Azure OpenAI Service provider, addressed by deployment.
pub struct AzureOpenAiProvider {
    inner: OpenAiProvider,
}

impl AzureOpenAiProvider {
    /// `endpoint`: e.g. "https://myresource.openai.azure.com"
    /// `deployment`: e.g. "gpt-4o"
    /// `api_version`: e.g. "2024-10-21"
    pub fn new(
        endpoint: &str,
        deployment: &str,
        api_key: &str,
        api_version: &str,
        options: RequestOptions,
    ) -> Result<Self, AgentError> {
        let url = deployment_url(endpoint, deployment, api_version);
        let inner =
            OpenAiProvider::with_endpoint("azure_openai", deployment, url, azure_headers(api_key)?, options)?;
        Ok(Self { inner })
    }

    pub fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}

fn deployment_url(endpoint: &str, deployment: &str, api_version: &str) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        endpoint.trim_end_matches('/'),
        deployment,
        api_version
    )
}

#[async_trait]
impl ModelProvider for AzureOpenAiProvider {
    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, AgentError> {
        self.inner.generate_text(request).await
    }
}
