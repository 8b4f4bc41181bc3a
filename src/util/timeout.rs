//! Deadline helper for gateway calls.

use std::future::Future;
use std::time::Duration;

use crate::error::AgentError;

/// Fail with [`AgentError::Timeout`] if `future` does not finish within `duration`.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, AgentError>>,
) -> Result<T, AgentError> {
    let limit_ms = duration.as_millis() as u64;
    tokio::time::timeout(duration, future).await.unwrap_or_else(|_| {
        tracing::debug!(limit_ms, "deadline elapsed");
        Err(AgentError::Timeout(limit_ms))
    })
}
