use chrono::{DateTime, Utc};
use parley_types::{ChatMessage, MessageRole, ProviderId};
use serde::{Deserialize, Serialize};

/// Database-agnostic conversation model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub model_id: String,
    pub provider: ProviderId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewConversation {
    pub user_id: String,
    pub title: String,
    pub model_id: String,
    pub provider: ProviderId,
}

impl NewConversation {
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        model_id: impl Into<String>,
        provider: ProviderId,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            model_id: model_id.into(),
            provider,
        }
    }

    pub fn into_conversation(self, now: DateTime<Utc>) -> Conversation {
        Conversation {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: self.user_id,
            title: self.title,
            model_id: self.model_id,
            provider: self.provider,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationUpdate {
    pub title: Option<String>,
    pub model_id: Option<String>,
    pub provider: Option<ProviderId>,
}

impl ConversationUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.model_id.is_none() && self.provider.is_none()
    }

    pub fn apply(&self, conversation: &mut Conversation, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            conversation.title = title.clone();
        }
        if let Some(model_id) = &self.model_id {
            conversation.model_id = model_id.clone();
        }
        if let Some(provider) = self.provider {
            conversation.provider = provider;
        }
        conversation.updated_at = now.max(conversation.created_at);
    }
}

/// A transcript entry tied to its conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub conversation_id: String,
    #[serde(flatten)]
    pub message: ChatMessage,
}

impl StoredMessage {
    pub fn role(&self) -> MessageRole {
        self.message.role
    }

    pub fn content(&self) -> &str {
        &self.message.content
    }
}

impl From<StoredMessage> for ChatMessage {
    fn from(stored: StoredMessage) -> Self {
        stored.message
    }
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: String,
    pub role: MessageRole,
    pub content: String,
    pub model: Option<String>,
}

impl NewMessage {
    pub fn user(conversation_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            role: MessageRole::User,
            content: content.into(),
            model: None,
        }
    }

    pub fn assistant(
        conversation_id: impl Into<String>,
        content: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            role: MessageRole::Assistant,
            content: content.into(),
            model: Some(model.into()),
        }
    }

    pub fn into_stored(self, id: String, timestamp: DateTime<Utc>) -> StoredMessage {
        StoredMessage {
            conversation_id: self.conversation_id,
            message: ChatMessage {
                id,
                role: self.role,
                content: self.content,
                timestamp,
                model: self.model,
            },
        }
    }
}
