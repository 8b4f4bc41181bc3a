//! The agent graph: an `agent` / `tools` / `end` state machine.
//!
//! Entry is the agent node. The agent node asks the model for one turn;
//! if that turn requests tools the tools node runs them and control
//! returns to the agent node, otherwise the run ends.

use std::sync::Arc;

use futures::future::join_all;
use futures::stream::BoxStream;
use serde::Serialize;
use strum::{Display, EnumString};
use tracing::{debug, info, warn};

use crate::error::{AgentError, Result};
use crate::provider::{ModelProvider, ProviderRequest};
use crate::tools::validation::check_arguments;
use crate::tools::{ToolArguments, ToolRegistry};
use crate::types::{AgentToolCall, GenerationSettings, ModelMessage};

use super::state::{ConversationState, StateUpdate};

/// Default ceiling on node visits per run.
pub const DEFAULT_MAX_STEPS: usize = 25;

/// Graph node identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GraphNode {
    Agent,
    Tools,
    End,
}

/// Snapshot emitted after each node visit.
#[derive(Debug, Clone, Serialize)]
pub struct GraphStep {
    pub node: GraphNode,
    /// Messages this visit appended.
    pub messages: Vec<ModelMessage>,
    /// Tool names requested so far in the run.
    pub tools_used: Vec<String>,
    pub step_count: usize,
    pub thread_id: String,
}

/// Nodes that do work. `End` is only ever a routing target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Agent,
    Tools,
}

impl Visit {
    /// The visit a routing decision leads to, if any.
    fn toward(node: GraphNode) -> Option<Self> {
        match node {
            GraphNode::Agent => Some(Visit::Agent),
            GraphNode::Tools => Some(Visit::Tools),
            GraphNode::End => None,
        }
    }
}

impl From<Visit> for GraphNode {
    fn from(visit: Visit) -> Self {
        match visit {
            Visit::Agent => GraphNode::Agent,
            Visit::Tools => GraphNode::Tools,
        }
    }
}

/// The compiled graph. Cheap to clone; provider and registry are shared.
#[derive(Clone)]
pub struct AgentGraph {
    provider: Arc<dyn ModelProvider>,
    registry: Arc<ToolRegistry>,
    settings: GenerationSettings,
    max_steps: usize,
}

impl AgentGraph {
    pub fn new(provider: Arc<dyn ModelProvider>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            provider,
            registry,
            settings: GenerationSettings::default(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Route after the agent node: tools if the last message requests any.
    pub fn should_continue(state: &ConversationState) -> GraphNode {
        match state.last_message() {
            Some(msg) if msg.has_tool_calls() => GraphNode::Tools,
            _ => GraphNode::End,
        }
    }

    /// Run to completion and return the final state.
    pub async fn run(&self, mut state: ConversationState) -> Result<ConversationState> {
        let mut visit = Some(Visit::Agent);
        while let Some(current) = visit {
            let (_, next) = self.step(&mut state, current).await?;
            visit = next;
        }
        info!(
            thread_id = %state.thread_id,
            steps = state.step_count,
            tools = state.tools_used.len(),
            total_tokens = state.usage.total_tokens,
            "graph run complete"
        );
        Ok(state)
    }

    /// Run lazily, yielding one snapshot per node visit.
    ///
    /// The first error ends the stream; snapshots already yielded stay valid.
    pub fn stream(&self, mut state: ConversationState) -> BoxStream<'static, Result<GraphStep>> {
        let graph = self.clone();
        Box::pin(async_stream::stream! {
            let mut visit = Some(Visit::Agent);
            while let Some(current) = visit {
                match graph.step(&mut state, current).await {
                    Ok((snapshot, next)) => {
                        visit = next;
                        yield Ok(snapshot);
                    }
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
        })
    }

    /// Visit one node, merge its update, and pick the next node.
    /// `None` means the run has reached `End`.
    async fn step(
        &self,
        state: &mut ConversationState,
        visit: Visit,
    ) -> Result<(GraphStep, Option<Visit>)> {
        if state.step_count >= self.max_steps {
            warn!(thread_id = %state.thread_id, limit = self.max_steps, "step limit reached");
            return Err(AgentError::StepLimitExceeded {
                limit: self.max_steps,
                thread_id: state.thread_id.clone(),
            });
        }

        let update = match visit {
            Visit::Agent => self.agent_node(state).await?,
            Visit::Tools => self.tools_node(state).await,
        };
        let new_messages = update.messages.clone();
        state.apply(update);

        let next = match visit {
            Visit::Agent => Self::should_continue(state),
            Visit::Tools => GraphNode::Agent,
        };
        let node = GraphNode::from(visit);
        debug!(
            thread_id = %state.thread_id,
            node = %node,
            step = state.step_count,
            next = %next,
            "node visited"
        );
        Ok((self.snapshot(state, node, new_messages), Visit::toward(next)))
    }

    fn snapshot(
        &self,
        state: &ConversationState,
        node: GraphNode,
        messages: Vec<ModelMessage>,
    ) -> GraphStep {
        GraphStep {
            node,
            messages,
            tools_used: state.tools_used.clone(),
            step_count: state.step_count,
            thread_id: state.thread_id.clone(),
        }
    }

    /// Ask the model for one turn over the full history.
    async fn agent_node(&self, state: &ConversationState) -> Result<StateUpdate> {
        let request = ProviderRequest {
            messages: state.messages.clone(),
            settings: self.settings.clone(),
            tools: Some(self.registry.definitions()).filter(|defs| !defs.is_empty()),
        };

        let response = self
            .provider
            .generate_text(&request)
            .await
            .inspect_err(|e| warn!(thread_id = %state.thread_id, error = %e, "model call failed"))?;

        let tools_used: Vec<String> = response.tool_calls.iter().map(|tc| tc.name.clone()).collect();
        if !tools_used.is_empty() {
            info!(thread_id = %state.thread_id, tools = ?tools_used, "model requested tools");
        }

        Ok(StateUpdate {
            messages: vec![ModelMessage::assistant_turn(response.text, response.tool_calls)],
            tools_used,
            usage: response.usage,
        })
    }

    /// Execute every tool call of the last message, keeping request order.
    async fn tools_node(&self, state: &ConversationState) -> StateUpdate {
        let calls: Vec<AgentToolCall> = state
            .last_message()
            .map(|msg| msg.tool_calls().into_iter().cloned().collect())
            .unwrap_or_default();

        let results = join_all(calls.iter().map(|call| self.invoke(call, &state.thread_id))).await;

        StateUpdate {
            messages: results,
            ..Default::default()
        }
    }

    /// Run one tool call; every outcome becomes a tool-result message.
    async fn invoke(&self, call: &AgentToolCall, thread_id: &str) -> ModelMessage {
        let Some(tool) = self.registry.get(&call.name) else {
            warn!(thread_id, tool = %call.name, "unknown tool requested");
            return ModelMessage::tool_result(&call.id, format!("Unknown tool: {}", call.name), true);
        };

        let args = ToolArguments::new(call.arguments.clone());
        let outcome = match check_arguments(tool.parameters(), &args) {
            Ok(()) => tool.execute(&args).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(text) => {
                debug!(thread_id, tool = %call.name, "tool succeeded");
                ModelMessage::tool_result(&call.id, text, false)
            }
            Err(e) => {
                warn!(thread_id, tool = %call.name, error = %e, "tool failed");
                ModelMessage::tool_result(
                    &call.id,
                    format!("Error executing {}: {e}", call.name),
                    true,
                )
            }
        }
    }
}
