//! Persistence-facing chat message shapes.
//!
//! `ChatMessage.parts` is the canonical content. Plain text is a derived view
//! (`ChatMessage::text`) and is never stored separately, so the two cannot
//! disagree.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::{ContentPart, ModelMessage, Role, ToolCallId};

/// Role of a stored chat message. Tool output folds into the assistant
/// message that requested it, so `tool` is not a stored role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

/// Lifecycle state of a tool invocation part.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvocationState {
    Call,
    Result,
}

/// A single part of a stored message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    Text {
        text: String,
    },
    ToolInvocation {
        tool_name: String,
        tool_call_id: ToolCallId,
        arguments: serde_json::Value,
        state: InvocationState,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<serde_json::Value>,
    },
    /// A part kind this version does not understand. Preserved so round-trips
    /// through the store never drop data.
    Unknown {
        raw_type: String,
    },
}

impl MessagePart {
    /// A tool invocation in the `call` state (never carries a result).
    pub fn invocation_call(
        tool_name: impl Into<String>,
        tool_call_id: impl Into<ToolCallId>,
        arguments: serde_json::Value,
    ) -> Self {
        Self::ToolInvocation {
            tool_name: tool_name.into(),
            tool_call_id: tool_call_id.into(),
            arguments,
            state: InvocationState::Call,
            result: None,
        }
    }

    /// A tool invocation in the `result` state (always carries a result).
    pub fn invocation_result(
        tool_name: impl Into<String>,
        tool_call_id: impl Into<ToolCallId>,
        arguments: serde_json::Value,
        result: serde_json::Value,
    ) -> Self {
        Self::ToolInvocation {
            tool_name: tool_name.into(),
            tool_call_id: tool_call_id.into(),
            arguments,
            state: InvocationState::Result,
            result: Some(result),
        }
    }
}

/// A chat message as stored by the persistence adapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub parts: Vec<MessagePart>,
    /// Position within the conversation; the store orders by this.
    pub created_order: usize,
}

impl ChatMessage {
    pub fn new(role: ChatRole, parts: Vec<MessagePart>, created_order: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            parts,
            created_order,
        }
    }

    /// Derived plain-text view of the message.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                MessagePart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Collapse a run transcript into stored chat messages.
///
/// Assistant tool calls become `ToolInvocation` parts in the `call` state;
/// the matching tool-result messages upgrade them to `result` state in place,
/// so the stored history never contains a bare `tool` role.
pub fn collapse_transcript(messages: &[ModelMessage]) -> Vec<ChatMessage> {
    let mut out: Vec<ChatMessage> = Vec::new();

    for message in messages {
        match message.role {
            Role::User | Role::System | Role::Assistant => {
                let role = match message.role {
                    Role::User => ChatRole::User,
                    Role::System => ChatRole::System,
                    _ => ChatRole::Assistant,
                };
                let parts = message
                    .content
                    .iter()
                    .map(|part| match part {
                        ContentPart::Text { text } => MessagePart::Text { text: text.clone() },
                        ContentPart::ToolCall(call) => MessagePart::invocation_call(
                            call.name.clone(),
                            call.id.clone(),
                            call.arguments.clone(),
                        ),
                        ContentPart::ToolResult(result) => MessagePart::invocation_result(
                            String::new(),
                            result.tool_call_id.clone(),
                            serde_json::Value::Null,
                            result.result.clone(),
                        ),
                    })
                    .collect();
                let order = out.len();
                out.push(ChatMessage::new(role, parts, order));
            }
            Role::Tool => {
                // Fold each result into the invocation part that requested it.
                for part in &message.content {
                    let ContentPart::ToolResult(result) = part else {
                        continue;
                    };
                    for stored in out.iter_mut().rev() {
                        if let Some(slot) = stored.parts.iter_mut().find(|p| {
                            matches!(
                                p,
                                MessagePart::ToolInvocation { tool_call_id, .. }
                                    if tool_call_id == &result.tool_call_id
                            )
                        }) {
                            if let MessagePart::ToolInvocation {
                                state,
                                result: result_slot,
                                ..
                            } = slot
                            {
                                *state = InvocationState::Result;
                                *result_slot = Some(result.result.clone());
                            }
                            break;
                        }
                    }
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::message::{AgentToolCall, AgentToolResult};
    use pretty_assertions::assert_eq;

    #[test]
    fn collapse_folds_tool_results_into_assistant_invocations() {
        let transcript = vec![
            ModelMessage::user("find rust news"),
            ModelMessage {
                role: Role::Assistant,
                content: vec![
                    ContentPart::Text {
                        text: "searching".to_string(),
                    },
                    ContentPart::ToolCall(AgentToolCall {
                        id: "call-1".into(),
                        name: "searchWeb".to_string(),
                        arguments: serde_json::json!({"query": "rust news"}),
                    }),
                ],
                timestamp: None,
            },
            ModelMessage::tool_result("call-1", serde_json::json!([{"title": "t"}]), false),
            ModelMessage::assistant("here is what I found"),
        ];

        let stored = collapse_transcript(&transcript);
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0].role, ChatRole::User);
        assert_eq!(stored[1].role, ChatRole::Assistant);
        assert_eq!(stored[2].role, ChatRole::Assistant);

        let invocation = stored[1]
            .parts
            .iter()
            .find_map(|p| match p {
                MessagePart::ToolInvocation { state, result, .. } => Some((*state, result.clone())),
                _ => None,
            })
            .expect("expected tool invocation part");
        assert_eq!(invocation.0, InvocationState::Result);
        assert!(invocation.1.is_some());
    }

    #[test]
    fn created_order_matches_position() {
        let transcript = vec![
            ModelMessage::user("a"),
            ModelMessage::assistant("b"),
            ModelMessage::user("c"),
        ];
        let stored = collapse_transcript(&transcript);
        let orders: Vec<usize> = stored.iter().map(|m| m.created_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn call_state_invocation_carries_no_result() {
        let part = MessagePart::invocation_call("searchWeb", "c1", serde_json::json!({}));
        match part {
            MessagePart::ToolInvocation { state, result, .. } => {
                assert_eq!(state, InvocationState::Call);
                assert!(result.is_none());
            }
            _ => panic!("expected tool invocation"),
        }
    }

    #[test]
    fn unknown_parts_round_trip_through_serde() {
        let part = MessagePart::Unknown {
            raw_type: "reasoning".to_string(),
        };
        let json = serde_json::to_string(&part).unwrap();
        let back: MessagePart = serde_json::from_str(&json).unwrap();
        assert_eq!(part, back);
    }
}
