//! In-memory conversation store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::DeepSearchError;

use super::{Conversation, ConversationStore, ConversationSummary, UpsertConversation};

/// Process-local store backed by a `HashMap`. The reference adapter and the
/// one used throughout the test suite.
#[derive(Default)]
pub struct MemoryStore {
    conversations: RwLock<HashMap<String, Conversation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn upsert_conversation(
        &self,
        request: UpsertConversation,
    ) -> Result<(), DeepSearchError> {
        let mut conversations = self
            .conversations
            .write()
            .map_err(|_| DeepSearchError::Persistence("store lock poisoned".to_string()))?;

        match conversations.get_mut(&request.conversation_id) {
            Some(existing) => {
                if existing.owner_id != request.owner_id {
                    return Err(DeepSearchError::Ownership {
                        conversation_id: request.conversation_id,
                    });
                }
                // Replace, not merge: the caller always sends the full list.
                existing.title = request.title;
                existing.messages = request.messages;
                existing.updated_at = Utc::now();
            }
            None => {
                let now = Utc::now();
                conversations.insert(
                    request.conversation_id.clone(),
                    Conversation {
                        id: request.conversation_id,
                        owner_id: request.owner_id,
                        title: request.title,
                        messages: request.messages,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }
        Ok(())
    }

    async fn fetch_conversation(
        &self,
        owner_id: &str,
        conversation_id: &str,
    ) -> Result<Conversation, DeepSearchError> {
        let conversations = self
            .conversations
            .read()
            .map_err(|_| DeepSearchError::Persistence("store lock poisoned".to_string()))?;
        conversations
            .get(conversation_id)
            .filter(|conversation| conversation.owner_id == owner_id)
            .cloned()
            .ok_or_else(|| DeepSearchError::NotFound {
                conversation_id: conversation_id.to_string(),
            })
    }

    async fn list_conversations(
        &self,
        owner_id: &str,
    ) -> Result<Vec<ConversationSummary>, DeepSearchError> {
        let conversations = self
            .conversations
            .read()
            .map_err(|_| DeepSearchError::Persistence("store lock poisoned".to_string()))?;
        let mut summaries: Vec<ConversationSummary> = conversations
            .values()
            .filter(|conversation| conversation.owner_id == owner_id)
            .map(|conversation| ConversationSummary {
                id: conversation.id.clone(),
                owner_id: conversation.owner_id.clone(),
                title: conversation.title.clone(),
                created_at: conversation.created_at,
                updated_at: conversation.updated_at,
            })
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }
}
