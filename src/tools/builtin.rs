//! Built-in tools exposed to the agent.
//!
//! Provides `current_time`, `calculator` and `search`. Each tool is
//! constructed via [`AgentTool::new`] and returned as `Arc<dyn Tool>`.
//!
//! # Usage
//!
//! ```rust
//! use graph_agent::tools::builtin::all_tools;
//!
//! let tools = all_tools("UTC");
//! assert_eq!(tools.len(), 3);
//! ```

use std::sync::{Arc, LazyLock};

use chrono::{FixedOffset, Utc};
use regex::Regex;

use crate::tools::expr;
use crate::tools::tool::{AgentTool, Tool};
use crate::tools::types::AgentToolParameters;

pub const CURRENT_TIME: &str = "current_time";
pub const CALCULATOR: &str = "calculator";
pub const SEARCH: &str = "search";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static OFFSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:utc|gmt)?\s*([+-])(\d{1,2})(?::?(\d{2}))?$")
        .expect("timezone offset regex must compile")
});

/// Resolve a timezone label to a fixed offset.
///
/// `UTC`, `GMT`, `Z` and explicit offsets (`+09:00`, `UTC+9`, `GMT-0530`)
/// resolve; named zones do not and are reported against UTC.
pub fn parse_offset(label: &str) -> Option<FixedOffset> {
    let label = label.trim();
    if ["utc", "gmt", "z"].iter().any(|z| label.eq_ignore_ascii_case(z)) {
        return FixedOffset::east_opt(0);
    }
    let caps = OFFSET_RE.captures(label)?;
    let hours: i32 = caps.get(2)?.as_str().parse().ok()?;
    let minutes: i32 = caps.get(3).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    let seconds = hours * 3600 + minutes * 60;
    if caps.get(1)?.as_str() == "-" {
        FixedOffset::west_opt(seconds)
    } else {
        FixedOffset::east_opt(seconds)
    }
}

/// Render the current time for a timezone label.
pub fn current_time_in(timezone: &str) -> String {
    let now = Utc::now();
    let rendered = match parse_offset(timezone) {
        Some(offset) => now.with_timezone(&offset).format(TIME_FORMAT).to_string(),
        None => now.format(TIME_FORMAT).to_string(),
    };
    format!("Current time ({timezone}): {rendered}")
}

/// Create the `current_time` tool.
///
/// `default_timezone` is used when the model omits the argument.
pub fn current_time_tool(default_timezone: impl Into<String>) -> Arc<dyn Tool> {
    let default_timezone: String = default_timezone.into();
    Arc::new(AgentTool::new(
        CURRENT_TIME,
        "Get the current time. Useful for time-sensitive queries.",
        AgentToolParameters::object()
            .string_with_default("timezone", "Timezone to get time for", default_timezone.clone())
            .build(),
        move |args| {
            let timezone = args
                .get_str_opt("timezone")
                .filter(|tz| !tz.trim().is_empty())
                .unwrap_or(default_timezone.as_str())
                .to_string();
            async move { Ok(current_time_in(&timezone)) }
        },
    ))
}

/// Evaluate an expression into the calculator's textual answer.
///
/// Evaluation failures are part of the answer, not an `Err`.
pub fn calculate(expression: &str) -> String {
    match expr::evaluate(expression) {
        Ok(value) => format!("Result: {value}"),
        Err(e) => format!("Error calculating '{expression}': {e}"),
    }
}

/// Create the `calculator` tool.
pub fn calculator_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        CALCULATOR,
        "Perform mathematical calculations. Input should be a valid mathematical expression.",
        AgentToolParameters::object()
            .string("expression", "Mathematical expression to evaluate", true)
            .build(),
        |args| async move {
            let expression = args.get_str("expression")?;
            Ok(calculate(expression))
        },
    ))
}

/// Create the `search` tool. Returns canned results.
pub fn search_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        SEARCH,
        "Search for information on the internet. This is a mock tool for demonstration.",
        AgentToolParameters::object()
            .string("query", "Search query", true)
            .build(),
        |args| async move {
            let query = args.get_str("query")?;
            Ok(format!(
                "Mock search results for '{query}': This is a demonstration search tool. \
                 In a real implementation, this would connect to a search API."
            ))
        },
    ))
}

/// All built-in tools in registry order.
pub fn all_tools(default_timezone: impl Into<String>) -> Vec<Arc<dyn Tool>> {
    vec![
        current_time_tool(default_timezone),
        calculator_tool(),
        search_tool(),
    ]
}
