//! Streaming types for model output.

use serde::{Deserialize, Serialize};

use super::message::AgentToolCall;

/// A delta emitted while the model streams a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamDelta {
    /// The incremental text chunk.
    #[serde(default)]
    pub text: String,
    /// Event type.
    pub event_type: StreamEventType,
    /// Tool call carried by a `ToolCallDelta` event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<AgentToolCall>,
}

impl StreamDelta {
    pub fn text_delta(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            event_type: StreamEventType::TextDelta,
            tool_call: None,
        }
    }

    pub fn tool_call_delta(call: AgentToolCall) -> Self {
        Self {
            text: String::new(),
            event_type: StreamEventType::ToolCallDelta,
            tool_call: Some(call),
        }
    }

    pub fn done() -> Self {
        Self {
            text: String::new(),
            event_type: StreamEventType::Done,
            tool_call: None,
        }
    }
}

/// Type of stream event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StreamEventType {
    /// Incremental text content.
    TextDelta,
    /// Tool call being built.
    ToolCallDelta,
    /// Stream finished.
    Done,
    /// Error during stream.
    Error,
}
