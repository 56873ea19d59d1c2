use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parley_types::ProviderId;

use crate::error::Result;
use crate::models::{
    Conversation, ConversationUpdate, CredentialPresence, DashboardStats, NewConversation,
    NewMessage, NewUser, StatsUpdate, StoredMessage, User, UserStats, UserUpdate,
};

/// Conversations and their transcripts
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn create(&self, new: NewConversation) -> Result<Conversation>;

    /// Owner-scoped lookup; another user's conversation reads as `None`
    async fn get(&self, conversation_id: &str, user_id: &str) -> Result<Option<Conversation>>;

    async fn update(&self, conversation_id: &str, update: ConversationUpdate)
        -> Result<Conversation>;

    /// Insert a message and bump the parent's `updated_at`
    async fn append(&self, message: NewMessage) -> Result<StoredMessage>;

    /// Oldest first; insertion order breaks timestamp ties
    async fn messages(&self, conversation_id: &str) -> Result<Vec<StoredMessage>>;

    /// Most recently updated first
    async fn list(&self, user_id: &str) -> Result<Vec<Conversation>>;

    /// Messages go first, then the conversation
    async fn delete(&self, conversation_id: &str) -> Result<()>;
}

/// Per-user provider credentials
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Upsert the credential for (user, provider)
    async fn save(&self, user_id: &str, provider: ProviderId, secret: &str) -> Result<()>;

    async fn presence(&self, user_id: &str) -> Result<CredentialPresence>;

    /// Missing records are not an error
    async fn delete(&self, user_id: &str, provider: ProviderId) -> Result<()>;

    /// Raw secret, only for stores that keep one (dev-mode local storage)
    async fn secret(&self, _user_id: &str, _provider: ProviderId) -> Result<Option<String>> {
        Ok(None)
    }
}

/// User profiles, usage stats and the admin dashboard
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates the profile together with a zeroed stats row
    async fn create_user(&self, new: NewUser) -> Result<User>;

    /// Newest first
    async fn list_users(&self) -> Result<Vec<User>>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    async fn update_user(&self, user_id: &str, update: UserUpdate) -> Result<User>;

    async fn delete_user(&self, user_id: &str) -> Result<()>;

    /// Sets `last_login` and counts a session
    async fn record_login(&self, user_id: &str, at: DateTime<Utc>) -> Result<User>;

    async fn get_stats(&self, user_id: &str) -> Result<Option<UserStats>>;

    async fn update_stats(&self, user_id: &str, update: StatsUpdate) -> Result<UserStats>;

    async fn record_message_sent(
        &self,
        user_id: &str,
        model_id: &str,
        at: DateTime<Utc>,
    ) -> Result<UserStats>;

    async fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardStats>;
}
