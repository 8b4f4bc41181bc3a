//! Route handlers.

use std::convert::Infallible;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use chrono::Utc;
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::agent::{ChatResult, GraphStep};
use crate::error::AgentError;
use crate::tools::ToolInfo;

use super::error::ApiError;
use super::{AppState, SERVICE_NAME};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub message: String,
    pub response: String,
    pub thread_id: String,
    pub tools_used: Vec<String>,
    pub created_at: String,
}

impl From<ChatResult> for ChatResponse {
    fn from(result: ChatResult) -> Self {
        Self {
            message: result.message,
            response: result.response,
            thread_id: result.thread_id,
            tools_used: result.tools_used,
            created_at: result.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub tools: Vec<ToolInfo>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(|r| ApiError::BadRequest {
        status: r.status(),
        detail: r.body_text(),
    })?;
    let result = state.agent.chat(&request.message, request.thread_id).await?;
    Ok(Json(result.into()))
}

pub async fn chat_stream_post(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let Json(request) = payload.map_err(|r| ApiError::BadRequest {
        status: r.status(),
        detail: r.body_text(),
    })?;
    open_stream(&state, request)
}

pub async fn chat_stream_get(
    State(state): State<AppState>,
    query: Result<Query<ChatRequest>, QueryRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let Query(request) = query.map_err(|r| ApiError::BadRequest {
        status: r.status(),
        detail: r.body_text(),
    })?;
    open_stream(&state, request)
}

fn open_stream(
    state: &AppState,
    request: ChatRequest,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let steps = state.agent.stream_chat(&request.message, request.thread_id)?;
    let events = steps.map(|item| Ok::<_, Infallible>(step_event(item)));
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// One `data:` event per step; a failure becomes `{"error": "..."}`.
fn step_event(item: Result<GraphStep, AgentError>) -> Event {
    let payload = match item.map(|step| serde_json::to_string(&step)) {
        Ok(Ok(json)) => json,
        Ok(Err(e)) => json!({ "error": e.to_string() }).to_string(),
        Err(e) => {
            warn!(error = %e, "chat stream failed");
            json!({ "error": e.to_string() }).to_string()
        }
    };
    Event::default().data(payload)
}

pub async fn list_tools(State(state): State<AppState>) -> Json<ToolsResponse> {
    let tools = state.agent.registry().infos();
    Json(ToolsResponse {
        total: tools.len(),
        tools,
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: Utc::now().to_rfc3339(),
    })
}
