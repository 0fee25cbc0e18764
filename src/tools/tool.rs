//! Tool trait for model-dispatched operations.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::arguments::ToolArguments;
use crate::error::DeepSearchError;

/// Core tool trait -- implement to expose an operation to the model.
///
/// Execution receives a cancellation token; long-running tools (HTTP fetches)
/// must observe it so a caller abort stops in-flight work promptly.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    /// Human-readable description declared to the model.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's arguments.
    fn parameters(&self) -> serde_json::Value;

    /// Execute the tool with validated arguments.
    async fn execute(
        &self,
        args: &ToolArguments,
        cancel: CancellationToken,
    ) -> Result<serde_json::Value, DeepSearchError>;
}
