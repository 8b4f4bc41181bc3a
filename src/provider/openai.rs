//! OpenAI Chat Completions provider.
//!
//! Also serves as the wire implementation behind the Azure provider, which
//! differs only in URL layout and auth header.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::AgentError;
use crate::types::*;
use crate::util::retry::RetryPolicy;
use crate::util::timeout::with_timeout;

use super::http::{bearer_headers, build_client, status_to_error};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Per-request transport limits.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Deadline for one HTTP attempt.
    pub timeout: Duration,
    /// Retries after the first attempt for retryable failures.
    pub max_retries: u32,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }
}

pub struct OpenAiProvider {
    provider_name: &'static str,
    model: String,
    url: String,
    headers: HeaderMap,
    client: reqwest::Client,
    retry: RetryPolicy,
    timeout: Duration,
}

impl OpenAiProvider {
    /// Provider for `api.openai.com` or any OpenAI-compatible base URL.
    pub fn new(
        model: impl Into<String>,
        api_key: &str,
        base_url: Option<String>,
        options: RequestOptions,
    ) -> Result<Self, AgentError> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        Self::with_endpoint("openai", model, url, bearer_headers(api_key)?, options)
    }

    /// Provider posting to a fully-formed completions URL with the given headers.
    pub(crate) fn with_endpoint(
        provider_name: &'static str,
        model: impl Into<String>,
        url: String,
        headers: HeaderMap,
        options: RequestOptions,
    ) -> Result<Self, AgentError> {
        Ok(Self {
            provider_name,
            model: model.into(),
            url,
            headers,
            client: build_client()?,
            retry: RetryPolicy::with_retries(options.max_retries),
            timeout: options.timeout,
        })
    }

    /// The URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.url
    }

    fn build_request_body(&self, request: &ProviderRequest) -> Value {
        let mut body = Map::new();
        body.insert("model".into(), self.model.clone().into());
        body.insert(
            "messages".into(),
            request.messages.iter().map(message_to_openai).collect(),
        );

        let settings = &request.settings;
        if let Some(max) = settings.max_tokens {
            body.insert("max_tokens".into(), max.into());
        }
        if let Some(temp) = settings.temperature {
            body.insert("temperature".into(), temp.into());
        }

        if let Some(tools) = request.tools.as_ref().filter(|t| !t.is_empty()) {
            let defs: Vec<Value> = tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
            body.insert("tools".into(), defs.into());
        }

        Value::Object(body)
    }

    async fn send_once(&self, body: &Value) -> Result<ProviderResponse, AgentError> {
        let resp = self
            .client
            .post(&self.url)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let headers = resp.headers().clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &headers, &text));
        }

        let text = resp.text().await?;
        let data: ChatResponse = serde_json::from_str(&text)?;
        parse_response(self.provider_name, data)
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        self.provider_name
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, AgentError> {
        let body = self.build_request_body(request);
        debug!(
            provider = self.provider_name,
            model = %self.model,
            messages = request.messages.len(),
            "chat completion request"
        );
        self.retry
            .execute(|| with_timeout(self.timeout, self.send_once(&body)))
            .await
    }
}

fn parse_response(provider: &str, data: ChatResponse) -> Result<ProviderResponse, AgentError> {
    let choice = data.choices.into_iter().next().ok_or_else(|| AgentError::Provider {
        provider: provider.to_string(),
        message: "no choices in chat completion response".into(),
    })?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| AgentToolCall {
            id: tc.id,
            name: tc.function.name,
            arguments: serde_json::from_str(&tc.function.arguments)
                .unwrap_or(Value::String(tc.function.arguments)),
        })
        .collect();

    Ok(ProviderResponse {
        text: choice.message.content.unwrap_or_default(),
        tool_calls,
        usage: data
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default(),
        finish_reason: choice.finish_reason.as_deref().and_then(parse_finish_reason),
    })
}

fn parse_finish_reason(s: &str) -> Option<FinishReason> {
    match s {
        "stop" => Some(FinishReason::Stop),
        "length" => Some(FinishReason::Length),
        "tool_calls" | "function_call" => Some(FinishReason::ToolCalls),
        "content_filter" => Some(FinishReason::ContentFilter),
        _ => None,
    }
}

fn message_to_openai(msg: &ModelMessage) -> Value {
    match msg.role {
        Role::Tool => {
            let (id, content) = msg
                .tool_result_part()
                .map(|r| (r.tool_call_id.as_str(), r.content.as_str()))
                .unwrap_or_default();
            json!({ "role": "tool", "tool_call_id": id, "content": content })
        }
        Role::Assistant if msg.has_tool_calls() => {
            let calls: Vec<Value> = msg
                .tool_calls()
                .into_iter()
                .map(|tc| {
                    json!({
                        "id": tc.id,
                        "type": "function",
                        "function": {
                            "name": tc.name,
                            "arguments": tc.arguments.to_string(),
                        }
                    })
                })
                .collect();
            let text = msg.text();
            json!({
                "role": "assistant",
                "content": if text.is_empty() { Value::Null } else { Value::String(text) },
                "tool_calls": calls,
            })
        }
        role => json!({ "role": role_name(role), "content": msg.text() }),
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    }
}

// Chat Completions response types (internal)

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ChoiceToolCall>>,
}

#[derive(Deserialize)]
struct ChoiceToolCall {
    id: String,
    function: ChoiceFunction,
}

#[derive(Deserialize)]
struct ChoiceFunction {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
