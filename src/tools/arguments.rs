//! Typed access to tool call arguments.

use crate::error::AgentError;

/// Wrapper around tool call arguments providing typed extraction.
///
/// Providers sometimes hand back the raw argument string instead of a
/// parsed object; [`ToolArguments::new`] normalizes that case.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        let value = match value {
            serde_json::Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    serde_json::json!({})
                } else {
                    serde_json::from_str(trimmed).unwrap_or(serde_json::Value::String(raw))
                }
            }
            serde_json::Value::Null => serde_json::json!({}),
            other => other,
        };
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, AgentError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_payload_is_parsed_as_json() {
        let args = ToolArguments::new(serde_json::json!("{\"query\": \"rust\"}"));
        assert_eq!(args.get_str("query").unwrap(), "rust");
    }

    #[test]
    fn empty_and_null_payloads_become_empty_objects() {
        assert_eq!(ToolArguments::new(serde_json::json!("  ")).raw(), &serde_json::json!({}));
        assert_eq!(ToolArguments::new(serde_json::Value::Null).raw(), &serde_json::json!({}));
    }

    #[test]
    fn missing_key_is_invalid_argument() {
        let args = ToolArguments::new(serde_json::json!({}));
        let err = args.get_str("expression").unwrap_err();
        assert!(matches!(err, AgentError::InvalidArgument(_)));
        assert!(err.to_string().contains("expression"));
    }
}
