//! Error types for deepsearch.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Primary error type for all deepsearch operations.
#[derive(Error, Debug)]
pub enum DeepSearchError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Provider error (status {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Rate limited: retries exhausted after {retries} attempts")]
    RateLimited { retries: usize },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Tool execution error in {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Daily request quota exceeded for owner {owner_id}")]
    QuotaExceeded { owner_id: String },

    #[error("Conversation {conversation_id} belongs to a different owner")]
    Ownership { conversation_id: String },

    #[error("Conversation {conversation_id} not found")]
    NotFound { conversation_id: String },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Run failed: {0}")]
    Run(RunError),
}

/// Why a run failed, with enough structure for a caller to decide whether a
/// retry makes sense. Unlike `DeepSearchError` this is `Clone`/serde, so it
/// can ride inside a `RunResult`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunError {
    pub message: String,
    pub category: ErrorCategory,
}

impl RunError {
    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

impl From<&DeepSearchError> for RunError {
    fn from(error: &DeepSearchError) -> Self {
        Self {
            message: error.to_string(),
            category: error.category(),
        }
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Coarse classification used for retry and escalation decisions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Configuration,
    Provider,
    Network,
    RateLimit,
    Timeout,
    ToolExecution,
    Quota,
    Persistence,
    Serialization,
    Other,
}

impl ErrorCategory {
    /// Whether faults of this category may clear up on their own.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::RateLimit | Self::Network | Self::Timeout)
    }
}

impl DeepSearchError {
    /// Create a provider error from an HTTP status and message.
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Provider { status, .. } => match status {
                429 => ErrorCategory::RateLimit,
                _ => ErrorCategory::Provider,
            },
            Self::Network(_) => ErrorCategory::Network,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::ToolExecution { .. } => ErrorCategory::ToolExecution,
            Self::QuotaExceeded { .. } => ErrorCategory::Quota,
            Self::Ownership { .. } | Self::NotFound { .. } | Self::Persistence(_) => {
                ErrorCategory::Persistence
            }
            Self::Run(run_error) => run_error.category,
            _ => ErrorCategory::Other,
        }
    }

    /// Whether a caller may reasonably retry the operation later.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, DeepSearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_is_retryable() {
        let err = DeepSearchError::RateLimited { retries: 3 };
        assert_eq!(err.category(), ErrorCategory::RateLimit);
        assert!(err.is_retryable());
    }

    #[test]
    fn provider_429_classified_as_rate_limit() {
        let err = DeepSearchError::provider(429, "slow down");
        assert_eq!(err.category(), ErrorCategory::RateLimit);
    }

    #[test]
    fn ownership_violation_is_not_retryable() {
        let err = DeepSearchError::Ownership {
            conversation_id: "c1".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Persistence);
        assert!(!err.is_retryable());
    }

    #[test]
    fn run_error_keeps_category_and_retryability() {
        let source = DeepSearchError::RateLimited { retries: 3 };
        let run_error = RunError::from(&source);
        assert_eq!(run_error.category, ErrorCategory::RateLimit);
        assert!(run_error.is_retryable());

        let rewrapped = DeepSearchError::Run(run_error);
        assert_eq!(rewrapped.category(), ErrorCategory::RateLimit);
        assert!(rewrapped.is_retryable());
    }

    #[test]
    fn quota_display_includes_owner() {
        let err = DeepSearchError::QuotaExceeded {
            owner_id: "user-7".to_string(),
        };
        assert!(err.to_string().contains("user-7"));
    }
}
