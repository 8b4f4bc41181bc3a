//! Error types for graph-agent.

use thiserror::Error;

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Server,
    Api,
    Configuration,
    Serialization,
    InvalidInput,
    StepLimit,
    Unknown,
}

/// Primary error type for all agent operations.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("Step limit of {limit} exceeded for thread {thread_id}")]
    StepLimitExceeded { limit: usize, thread_id: String },
}

impl AgentError {
    /// Create an API error from a status code and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::InvalidArgument(_) => ErrorCategory::InvalidInput,
            Self::StepLimitExceeded { .. } => ErrorCategory::StepLimit,
            Self::Io(_) | Self::Provider { .. } => ErrorCategory::Unknown,
        }
    }

    /// Whether this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_maps_to_category() {
        assert_eq!(AgentError::api(401, "no").category(), ErrorCategory::Authentication);
        assert_eq!(AgentError::api(429, "slow").category(), ErrorCategory::RateLimit);
        assert_eq!(AgentError::api(503, "down").category(), ErrorCategory::Server);
        assert_eq!(AgentError::api(400, "bad").category(), ErrorCategory::Api);
    }

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(AgentError::Timeout(10).is_retryable());
        assert!(AgentError::api(502, "gateway").is_retryable());
        assert!(!AgentError::Authentication("denied".into()).is_retryable());
        assert!(!AgentError::InvalidArgument("missing query".into()).is_retryable());
        assert!(!AgentError::StepLimitExceeded {
            limit: 3,
            thread_id: "t".into()
        }
        .is_retryable());
    }
}
