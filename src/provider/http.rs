//! HTTP client construction, auth headers, and status mapping.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};

use crate::error::AgentError;

/// Build the client a provider reuses for every request.
pub fn build_client() -> Result<reqwest::Client, AgentError> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(AgentError::Network)
}

/// Headers for a Bearer-token API (OpenAI and compatibles).
pub fn bearer_headers(api_key: &str) -> Result<HeaderMap, AgentError> {
    let mut headers = json_headers();
    let value = HeaderValue::from_str(&format!("Bearer {api_key}"))
        .map_err(|_| AgentError::Configuration("API key contains invalid characters".into()))?;
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Headers for Azure OpenAI (`api-key`).
pub fn azure_headers(api_key: &str) -> Result<HeaderMap, AgentError> {
    let mut headers = json_headers();
    let value = HeaderValue::from_str(api_key)
        .map_err(|_| AgentError::Configuration("API key contains invalid characters".into()))?;
    headers.insert("api-key", value);
    Ok(headers)
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Map a non-success HTTP status and body to an [`AgentError`].
pub fn status_to_error(status: u16, headers: &HeaderMap, body: &str) -> AgentError {
    let message = error_message(body);
    match status {
        401 | 403 => AgentError::Authentication(message),
        429 => AgentError::RateLimited {
            retry_after_ms: retry_after_header(headers).or_else(|| retry_after_body(body)),
        },
        _ => AgentError::api(status, message),
    }
}

/// Prefer `error.message` from a JSON error body, else the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

fn retry_after_header(headers: &HeaderMap) -> Option<u64> {
    let secs: f64 = headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()?;
    Some((secs * 1000.0) as u64)
}

fn retry_after_body(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}
