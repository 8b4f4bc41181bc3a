//! Check model-supplied arguments against a tool's declared schema.

use super::arguments::ToolArguments;
use super::types::AgentToolParameters;
use crate::error::AgentError;

/// Top-level schema check: object shape, required fields, and property types.
///
/// Runs before a tool executes so malformed arguments surface as a
/// descriptive tool error instead of a confusing downstream failure.
pub fn check_arguments(
    parameters: &AgentToolParameters,
    args: &ToolArguments,
) -> Result<(), AgentError> {
    let schema = &parameters.schema;
    let args = args.raw();

    let Some(obj) = args.as_object() else {
        return Err(AgentError::InvalidArgument(format!(
            "expected object arguments, got {}",
            json_type_name(args)
        )));
    };

    let required = schema
        .get("required")
        .and_then(|v| v.as_array())
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str());
    for field in required {
        if !obj.contains_key(field) {
            return Err(AgentError::InvalidArgument(format!(
                "missing required field '{field}'"
            )));
        }
    }

    let Some(properties) = schema.get("properties").and_then(|v| v.as_object()) else {
        return Ok(());
    };
    for (key, value) in obj {
        let expected = properties
            .get(key)
            .and_then(|prop| prop.get("type"))
            .and_then(|t| t.as_str());
        if let Some(expected) = expected {
            if !value_matches_type(value, expected) {
                return Err(AgentError::InvalidArgument(format!(
                    "field '{key}' expected type '{expected}', got {}",
                    json_type_name(value)
                )));
            }
        }
    }

    Ok(())
}

fn value_matches_type(value: &serde_json::Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        _ => true,
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
