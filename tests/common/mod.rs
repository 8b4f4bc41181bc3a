//! Shared test helpers and scripted mock provider.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use graph_agent::agent::Agent;
use graph_agent::error::AgentError;
use graph_agent::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use graph_agent::tools::ToolRegistry;
use graph_agent::types::*;

/// A provider that replays queued turns and records every request.
pub struct MockProvider {
    responses: Mutex<Vec<Result<ProviderResponse, AgentError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a final text turn.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push(Ok(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        }));
    }

    /// Queue a turn requesting one tool.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.queue_tool_calls(vec![(id, name, args)]);
    }

    /// Queue a turn requesting several tools at once.
    pub fn queue_tool_calls(&self, calls: Vec<(&str, &str, serde_json::Value)>) {
        let tool_calls = calls
            .into_iter()
            .map(|(id, name, arguments)| AgentToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments,
            })
            .collect();
        self.responses.lock().unwrap().push(Ok(ProviderResponse {
            text: String::new(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            tool_calls,
            finish_reason: Some(FinishReason::ToolCalls),
        }));
    }

    /// Queue a gateway failure.
    pub fn queue_error(&self, error: AgentError) {
        self.responses.lock().unwrap().push(Err(error));
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, AgentError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(ProviderResponse {
                text: "Mock response".to_string(),
                finish_reason: Some(FinishReason::Stop),
                ..Default::default()
            });
        }
        responses.remove(0)
    }
}

/// A provider whose every turn asks for the calculator again.
pub struct LoopingProvider;

#[async_trait]
impl ModelProvider for LoopingProvider {
    fn provider_name(&self) -> &str {
        "looping"
    }

    fn model_id(&self) -> &str {
        "looping-model"
    }

    async fn generate_text(&self, _request: &ProviderRequest) -> Result<ProviderResponse, AgentError> {
        Ok(ProviderResponse {
            tool_calls: vec![AgentToolCall {
                id: "call_loop".into(),
                name: "calculator".into(),
                arguments: serde_json::json!({"expression": "1 + 1"}),
            }],
            finish_reason: Some(FinishReason::ToolCalls),
            ..Default::default()
        })
    }
}

/// An agent over the built-in tools and the given provider.
pub fn agent_with(provider: Arc<dyn ModelProvider>) -> Agent {
    Agent::new(provider, Arc::new(ToolRegistry::builtin("UTC")))
}
