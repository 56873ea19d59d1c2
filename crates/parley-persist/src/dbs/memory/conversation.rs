use async_trait::async_trait;
use chrono::Utc;

use super::MemoryStore;
use crate::error::{PersistError, Result};
use crate::models::{Conversation, ConversationUpdate, NewConversation, NewMessage, StoredMessage};
use crate::traits::ConversationStore;

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn create(&self, new: NewConversation) -> Result<Conversation> {
        let conversation = new.into_conversation(Utc::now());
        let mut state = self.state.write().await;
        state
            .conversations
            .insert(conversation.id.clone(), conversation.clone());
        state.messages.insert(conversation.id.clone(), Vec::new());
        Ok(conversation)
    }

    async fn get(&self, conversation_id: &str, user_id: &str) -> Result<Option<Conversation>> {
        let state = self.state.read().await;
        Ok(state
            .conversations
            .get(conversation_id)
            .filter(|c| c.user_id == user_id)
            .cloned())
    }

    async fn update(
        &self,
        conversation_id: &str,
        update: ConversationUpdate,
    ) -> Result<Conversation> {
        let mut state = self.state.write().await;
        let conversation = state
            .conversations
            .get_mut(conversation_id)
            .ok_or_else(|| PersistError::ConversationNotFound(conversation_id.to_string()))?;
        update.apply(conversation, Utc::now());
        Ok(conversation.clone())
    }

    async fn append(&self, message: NewMessage) -> Result<StoredMessage> {
        let mut state = self.state.write().await;
        let now = Utc::now();

        let conversation = state
            .conversations
            .get_mut(&message.conversation_id)
            .ok_or_else(|| PersistError::ConversationNotFound(message.conversation_id.clone()))?;
        conversation.updated_at = now.max(conversation.created_at);

        let stored = message.into_stored(uuid::Uuid::new_v4().to_string(), now);
        state
            .messages
            .entry(stored.conversation_id.clone())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn messages(&self, conversation_id: &str) -> Result<Vec<StoredMessage>> {
        let state = self.state.read().await;
        let mut messages = state
            .messages
            .get(conversation_id)
            .cloned()
            .unwrap_or_default();
        // Stable: equal timestamps keep insertion order
        messages.sort_by_key(|m| m.message.timestamp);
        Ok(messages)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Conversation>> {
        let state = self.state.read().await;
        let mut conversations: Vec<Conversation> = state
            .conversations
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(conversations)
    }

    async fn delete(&self, conversation_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.messages.remove(conversation_id);
        state
            .conversations
            .remove(conversation_id)
            .map(|_| ())
            .ok_or_else(|| PersistError::ConversationNotFound(conversation_id.to_string()))
    }
}
