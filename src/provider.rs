//! The model-completion capability boundary.
//!
//! The engine itself is an external collaborator: given a message context and
//! a declared tool set, it streams back deltas that may contain text and/or
//! tool invocations. Everything behind this trait (transport, SSE parsing,
//! vendor auth) is out of scope.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::DeepSearchError;
use crate::types::{ModelMessage, StreamDelta};

/// A request sent to the completion engine.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ModelMessage>,
    pub system: Option<String>,
    pub tools: Vec<ToolDefinition>,
}

/// Tool definition declared to the completion engine.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Core trait implemented by completion engines.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Engine name for logging.
    fn name(&self) -> &str;

    /// Stream a completion for the given context.
    async fn stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<BoxStream<'static, Result<StreamDelta, DeepSearchError>>, DeepSearchError>;
}
