//! Closed, name-indexed set of tools available to the agent.

use std::collections::HashMap;
use std::sync::Arc;

use super::builtin;
use super::tool::Tool;
use super::types::ToolInfo;
use crate::error::AgentError;
use crate::provider::ToolDefinition;

/// Fixed tool set built once at startup and shared read-only across runs.
///
/// Lookup is by exact name; a model-supplied name that is not registered
/// never resolves to anything.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build a registry from tools in listing order. Names must be unique.
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Result<Self, AgentError> {
        let mut by_name = HashMap::with_capacity(tools.len());
        for (idx, tool) in tools.iter().enumerate() {
            if by_name.insert(tool.name().to_string(), idx).is_some() {
                return Err(AgentError::Configuration(format!(
                    "duplicate tool name '{}'",
                    tool.name()
                )));
            }
        }
        Ok(Self { tools, by_name })
    }

    /// The built-in registry: `current_time`, `calculator`, `search`.
    pub fn builtin(default_timezone: impl Into<String>) -> Self {
        let tools = builtin::all_tools(default_timezone);
        let by_name = tools
            .iter()
            .enumerate()
            .map(|(idx, tool)| (tool.name().to_string(), idx))
            .collect();
        Self { tools, by_name }
    }

    /// All tools in registration order.
    pub fn list_tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Listing metadata in registration order.
    pub fn infos(&self) -> Vec<ToolInfo> {
        self.tools.iter().map(|t| t.info()).collect()
    }

    /// Tool definitions handed to the model provider.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters().schema.clone(),
            })
            .collect()
    }

    /// Look up a tool by exact name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.by_name.get(name).map(|&idx| &self.tools[idx])
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tools.iter().map(|t| t.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::AgentToolParameters;
    use crate::tools::AgentTool;

    fn noop(name: &str) -> Arc<dyn Tool> {
        Arc::new(AgentTool::new(
            name,
            "noop",
            AgentToolParameters::object().build(),
            |_| async { Ok(String::new()) },
        ))
    }

    #[test]
    fn builtin_order_is_fixed() {
        let registry = ToolRegistry::builtin("UTC");
        let names: Vec<_> = registry.list_tools().iter().map(|t| t.name().to_string()).collect();
        assert_eq!(names, ["current_time", "calculator", "search"]);
    }

    #[test]
    fn lookup_is_exact() {
        let registry = ToolRegistry::builtin("UTC");
        assert!(registry.get("calculator").is_some());
        assert!(registry.get("Calculator").is_none());
        assert!(registry.get("foo").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = ToolRegistry::new(vec![noop("a"), noop("a")]).unwrap_err();
        assert!(err.to_string().contains("duplicate tool name 'a'"));
    }

    #[test]
    fn definitions_follow_registry_order() {
        let registry = ToolRegistry::new(vec![noop("b"), noop("a")]).unwrap();
        let defs = registry.definitions();
        assert_eq!(defs[0].name, "b");
        assert_eq!(defs[1].name, "a");
    }
}
