//! Core run types for the agent loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DeepSearchError, RunError};
use crate::types::ModelMessage;

/// Unique run identifier.
pub type RunId = Uuid;

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    /// Forced termination: the round budget ran out while the model was
    /// still requesting tools. Partial text, if any, is in `final_text`.
    BudgetExhausted,
    Failed,
    Canceled,
}

/// Result of a run, including the full transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub status: RunStatus,
    /// Present only on `Failed`; keeps the category so callers can tell a
    /// retryable rate-limit exhaustion from a hard provider fault.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RunError>,
    /// Original messages plus every tool round and the final assistant text.
    pub messages: Vec<ModelMessage>,
    /// Text of the final assistant message (empty when none was produced).
    pub final_text: String,
    pub finished_at: DateTime<Utc>,
}

impl RunResult {
    pub fn completed(messages: Vec<ModelMessage>, final_text: String) -> Self {
        Self {
            status: RunStatus::Completed,
            error: None,
            messages,
            final_text,
            finished_at: Utc::now(),
        }
    }

    pub fn budget_exhausted(messages: Vec<ModelMessage>, final_text: String) -> Self {
        Self {
            status: RunStatus::BudgetExhausted,
            error: None,
            messages,
            final_text,
            finished_at: Utc::now(),
        }
    }

    pub fn failed(error: &DeepSearchError, messages: Vec<ModelMessage>) -> Self {
        Self {
            status: RunStatus::Failed,
            error: Some(RunError::from(error)),
            messages,
            final_text: String::new(),
            finished_at: Utc::now(),
        }
    }

    pub fn canceled(messages: Vec<ModelMessage>) -> Self {
        Self {
            status: RunStatus::Canceled,
            error: None,
            messages,
            final_text: String::new(),
            finished_at: Utc::now(),
        }
    }

    /// Whether the run reached a terminal answer (completion or forced
    /// budget termination). Only such runs are persisted.
    pub fn is_done(&self) -> bool {
        matches!(
            self.status,
            RunStatus::Completed | RunStatus::BudgetExhausted
        )
    }
}
