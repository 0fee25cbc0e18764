//! Shared types.

pub mod chat;
pub mod message;
pub mod search;
pub mod stream;

pub use chat::{collapse_transcript, ChatMessage, ChatRole, InvocationState, MessagePart};
pub use message::{AgentToolCall, AgentToolResult, ContentPart, ModelMessage, Role, ToolCallId};
pub use search::SearchResult;
pub use stream::{StreamDelta, StreamEventType};
