//! Entry points for one chat turn: blocking result or step stream.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use futures::stream::BoxStream;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{AgentError, Result};
use crate::provider::{self, ModelProvider};
use crate::tools::ToolRegistry;
use crate::types::GenerationSettings;

use super::graph::{AgentGraph, GraphStep};
use super::state::ConversationState;

const LOG_PREVIEW_CHARS: usize = 100;

/// Outcome of a completed chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResult {
    /// The user's message, echoed back.
    pub message: String,
    pub response: String,
    pub thread_id: String,
    pub tools_used: Vec<String>,
    /// RFC 3339 UTC.
    pub created_at: String,
    pub step_count: usize,
}

/// Conversation orchestrator shared by the HTTP server and CLI.
#[derive(Clone)]
pub struct Agent {
    graph: AgentGraph,
    system_prompt: Option<String>,
}

impl Agent {
    pub fn new(provider: Arc<dyn ModelProvider>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            graph: AgentGraph::new(provider, registry),
            system_prompt: None,
        }
    }

    /// Build the configured provider and the built-in tools.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = provider::create_provider(config)?;
        let registry = Arc::new(ToolRegistry::builtin(config.agent.default_timezone.clone()));
        let mut agent = Self::new(provider, registry)
            .with_settings(provider::generation_settings(config))
            .with_max_steps(config.agent.max_steps);
        if let Some(prompt) = &config.agent.system_prompt {
            agent = agent.with_system_prompt(prompt.clone());
        }
        Ok(agent)
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.graph = self.graph.with_settings(settings);
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.graph = self.graph.with_max_steps(max_steps);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.graph.registry()
    }

    /// Run one turn to completion.
    pub async fn chat(&self, message: &str, thread_id: Option<String>) -> Result<ChatResult> {
        let state = self.initial_state(message, thread_id)?;
        info!(
            thread_id = %state.thread_id,
            message = %preview(message),
            "chat request"
        );

        let state = self.graph.run(state).await?;
        Ok(ChatResult {
            message: message.to_string(),
            response: state.final_response(),
            thread_id: state.thread_id,
            tools_used: state.tools_used,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            step_count: state.step_count,
        })
    }

    /// Run one turn lazily, one [`GraphStep`] per node visit.
    ///
    /// Input is validated up front so a bad message never opens a stream.
    pub fn stream_chat(
        &self,
        message: &str,
        thread_id: Option<String>,
    ) -> Result<BoxStream<'static, Result<GraphStep>>> {
        let state = self.initial_state(message, thread_id)?;
        info!(
            thread_id = %state.thread_id,
            message = %preview(message),
            "streaming chat request"
        );
        Ok(self.graph.stream(state))
    }

    fn initial_state(&self, message: &str, thread_id: Option<String>) -> Result<ConversationState> {
        if message.trim().is_empty() {
            return Err(AgentError::InvalidArgument("message must not be empty".into()));
        }
        let thread_id = thread_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(new_thread_id);
        Ok(ConversationState::new(
            thread_id,
            self.system_prompt.as_deref(),
            message,
        ))
    }
}

/// A fresh random thread id.
pub fn new_thread_id() -> String {
    Uuid::new_v4().to_string()
}

/// First 100 characters of a message for log lines.
fn preview(message: &str) -> String {
    match message.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &message[..idx]),
        None => message.to_string(),
    }
}
