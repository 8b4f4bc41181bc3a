//! Tests for the tool registry and built-in tools.

use pretty_assertions::assert_eq;
use serde_json::json;

use graph_agent::tools::builtin::{calculate, calculator_tool, current_time_tool, search_tool};
use graph_agent::tools::*;

#[tokio::test]
async fn calculator_evaluates_and_reports_failures_as_text() {
    let tool = calculator_tool();
    let ok = tool
        .execute(&ToolArguments::new(json!({"expression": "2 + 3"})))
        .await
        .unwrap();
    assert_eq!(ok, "Result: 5");

    let failed = tool
        .execute(&ToolArguments::new(json!({"expression": "invalid"})))
        .await
        .unwrap();
    assert!(failed.starts_with("Error calculating 'invalid':"));
}

#[test]
fn calculator_answers_match_python_arithmetic() {
    assert_eq!(calculate("2 ** 64"), "Result: 18446744073709551616");
    assert_eq!(calculate("round(1234, -2)"), "Result: 1200");
    assert!(calculate("0 ** -1").starts_with("Error calculating '0 ** -1':"));
    assert!(calculate("10.0 ** 1000").starts_with("Error calculating"));
}

#[tokio::test]
async fn calculator_requires_an_expression() {
    let err = calculator_tool()
        .execute(&ToolArguments::new(json!({})))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("expression"));
}

#[tokio::test]
async fn calculator_accepts_string_encoded_arguments() {
    let args = ToolArguments::new(json!("{\"expression\": \"max(3, 9) - 1\"}"));
    let out = calculator_tool().execute(&args).await.unwrap();
    assert_eq!(out, "Result: 8");
}

#[tokio::test]
async fn current_time_uses_requested_or_default_zone() {
    let tool = current_time_tool("+09:00");
    let default = tool.execute(&ToolArguments::new(json!({}))).await.unwrap();
    assert!(default.starts_with("Current time (+09:00): "));

    let utc = tool
        .execute(&ToolArguments::new(json!({"timezone": "UTC"})))
        .await
        .unwrap();
    let stamp = utc.trim_start_matches("Current time (UTC): ");
    assert!(chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").is_ok());
}

#[tokio::test]
async fn search_is_a_canned_answer() {
    let out = search_tool()
        .execute(&ToolArguments::new(json!({"query": "rust"})))
        .await
        .unwrap();
    assert_eq!(
        out,
        "Mock search results for 'rust': This is a demonstration search tool. \
         In a real implementation, this would connect to a search API."
    );
}

#[test]
fn listing_is_stable_and_described() {
    let registry = ToolRegistry::builtin("UTC");
    let first: Vec<_> = registry.infos().into_iter().map(|t| t.name).collect();
    let second: Vec<_> = registry.infos().into_iter().map(|t| t.name).collect();
    assert_eq!(first, vec!["current_time", "calculator", "search"]);
    assert_eq!(first, second);
    assert!(registry.infos().iter().all(|t| !t.description.is_empty()));
    assert!(registry
        .infos()
        .iter()
        .all(|t| t.input_schema["type"] == "object"));
}

#[tokio::test]
async fn custom_tools_register_beside_builtins() {
    let echo = std::sync::Arc::new(AgentTool::new(
        "echo",
        "Echo the text back",
        AgentToolParameters::object().string("text", "Text", true).build(),
        |args| async move { Ok(args.get_str("text")?.to_string()) },
    )) as std::sync::Arc<dyn Tool>;

    let mut tools = builtin::all_tools("UTC");
    tools.push(echo);
    let registry = ToolRegistry::new(tools).unwrap();

    assert_eq!(registry.len(), 4);
    let out = registry
        .get("echo")
        .unwrap()
        .execute(&ToolArguments::new(json!({"text": "hi"})))
        .await
        .unwrap();
    assert_eq!(out, "hi");
}
