//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::error::{AgentError, ErrorCategory};

/// Error returned by route handlers, rendered as `{"detail": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// The request was rejected before the graph ran.
    BadRequest { status: StatusCode, detail: String },
    /// The graph run failed.
    ChatFailed(AgentError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { status, .. } => *status,
            Self::ChatFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::BadRequest { detail, .. } => detail.clone(),
            Self::ChatFailed(e) => format!("Chat processing failed: {e}"),
        }
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err.category() {
            ErrorCategory::InvalidInput => Self::BadRequest {
                status: StatusCode::BAD_REQUEST,
                detail: err.to_string(),
            },
            _ => Self::ChatFailed(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), detail = %self.detail(), "request failed");
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}
