//! Conversation persistence.

pub mod memory;
pub mod quota;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DeepSearchError;
use crate::types::ChatMessage;

pub use memory::MemoryStore;
pub use quota::DailyQuota;

/// A stored conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conversation listing entry. Messages are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An upsert request: creates the conversation when the id is unknown,
/// otherwise replaces its title and full message list.
#[derive(Debug, Clone)]
pub struct UpsertConversation {
    pub owner_id: String,
    pub conversation_id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
}

/// Conversation storage adapter.
///
/// Every operation is owner-scoped. Fetching someone else's conversation is
/// indistinguishable from fetching one that does not exist; upserting over
/// someone else's conversation is an ownership error.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn upsert_conversation(
        &self,
        request: UpsertConversation,
    ) -> Result<(), DeepSearchError>;

    async fn fetch_conversation(
        &self,
        owner_id: &str,
        conversation_id: &str,
    ) -> Result<Conversation, DeepSearchError>;

    /// List the owner's conversations, most recently updated first.
    async fn list_conversations(
        &self,
        owner_id: &str,
    ) -> Result<Vec<ConversationSummary>, DeepSearchError>;
}
