//! One-shot convenience entry point.

use crate::error::DeepSearchError;

use super::runner::{RunRequest, Runner};
use super::types::RunStatus;

/// Run a request to completion and return the final answer text.
///
/// Intended for evaluation harnesses and scripts that do not care about
/// streaming. Budget-exhausted runs still return their partial text; failed
/// and canceled runs are errors.
pub async fn ask(runner: &dyn Runner, request: RunRequest) -> Result<String, DeepSearchError> {
    let handle = runner.start(request).await?;
    let result = handle.wait().await?;
    match result.status {
        RunStatus::Completed | RunStatus::BudgetExhausted => Ok(result.final_text),
        // Keep the run error's category so `is_retryable()` still answers
        // correctly for rate-limit exhaustion.
        RunStatus::Failed => Err(match result.error {
            Some(run_error) => DeepSearchError::Run(run_error),
            None => DeepSearchError::InvalidState(
                "run failed without an error message".to_string(),
            ),
        }),
        RunStatus::Canceled => Err(DeepSearchError::InvalidState("run was canceled".to_string())),
    }
}
