//! Convenience re-exports for common use.

pub use crate::agent::{Agent, AgentGraph, ChatResult, GraphNode, GraphStep};
pub use crate::config::{AppConfig, LoadOptions};
pub use crate::error::{AgentError, Result};
pub use crate::provider::{ModelProvider, ProviderRequest, ProviderResponse};
pub use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolArguments, ToolRegistry};
pub use crate::types::{ContentPart, GenerationSettings, ModelMessage, Role, Usage};
