use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use mongodb::Client;
use parley_types::ProviderId;

use super::models::{MongoConversation, MongoMessage, MongoUser, MongoUserStats};
use super::repositories::{
    MongoConversationRepository, MongoCredentialRepository, MongoMessageRepository,
    MongoStatsRepository, MongoUserRepository,
};
use crate::dashboard;
use crate::error::{PersistError, Result};
use crate::fingerprint::fingerprint;
use crate::models::{
    Conversation, ConversationUpdate, CredentialPresence, CredentialRecord, DashboardStats,
    NewConversation, NewMessage, NewUser, StatsUpdate, StoredMessage, User, UserStats, UserUpdate,
};
use crate::traits::{ConversationStore, CredentialStore, UserStore};

/// Hosted backend; implements every store trait
pub struct MongoStore {
    conversations: MongoConversationRepository,
    messages: MongoMessageRepository,
    credentials: MongoCredentialRepository,
    users: MongoUserRepository,
    stats: MongoStatsRepository,
}

impl MongoStore {
    /// Connect to MongoDB and create client
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        Ok(Self {
            conversations: MongoConversationRepository::new(&client, database),
            messages: MongoMessageRepository::new(&client, database),
            credentials: MongoCredentialRepository::new(&client, database),
            users: MongoUserRepository::new(&client, database),
            stats: MongoStatsRepository::new(&client, database),
        })
    }
}

fn bson_now() -> bson::DateTime {
    bson::DateTime::from_chrono(Utc::now())
}

#[async_trait]
impl ConversationStore for MongoStore {
    async fn create(&self, new: NewConversation) -> Result<Conversation> {
        let conversation = new.into_conversation(Utc::now());
        self.conversations
            .insert(&MongoConversation::from(conversation.clone()))
            .await?;
        Ok(conversation)
    }

    async fn get(&self, conversation_id: &str, user_id: &str) -> Result<Option<Conversation>> {
        let found = self.conversations.get(conversation_id, user_id).await?;
        Ok(found.map(Into::into))
    }

    async fn update(
        &self,
        conversation_id: &str,
        update: ConversationUpdate,
    ) -> Result<Conversation> {
        let mut set = Document::new();
        if let Some(title) = update.title {
            set.insert("title", title);
        }
        if let Some(model_id) = update.model_id {
            set.insert("model_id", model_id);
        }
        if let Some(provider) = update.provider {
            set.insert("provider", bson::to_bson(&provider)?);
        }
        set.insert("updated_at", bson_now());

        self.conversations
            .update(conversation_id, set)
            .await?
            .map(Into::into)
            .ok_or_else(|| PersistError::ConversationNotFound(conversation_id.to_string()))
    }

    async fn append(&self, message: NewMessage) -> Result<StoredMessage> {
        let now = bson_now();
        if !self.conversations.touch(&message.conversation_id, now).await? {
            return Err(PersistError::ConversationNotFound(message.conversation_id));
        }

        let mongo_message = MongoMessage {
            id: ObjectId::new(),
            conversation_id: message.conversation_id,
            role: message.role,
            content: message.content,
            timestamp: now,
            model: message.model,
        };
        self.messages.insert(&mongo_message).await?;
        Ok(mongo_message.into())
    }

    async fn messages(&self, conversation_id: &str) -> Result<Vec<StoredMessage>> {
        let messages = self.messages.list(conversation_id).await?;
        Ok(messages.into_iter().map(Into::into).collect())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Conversation>> {
        let conversations = self.conversations.list(user_id).await?;
        Ok(conversations.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, conversation_id: &str) -> Result<()> {
        self.messages.delete_for_conversation(conversation_id).await?;
        if self.conversations.delete(conversation_id).await? == 0 {
            return Err(PersistError::ConversationNotFound(conversation_id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MongoStore {
    async fn save(&self, user_id: &str, provider: ProviderId, secret: &str) -> Result<()> {
        self.credentials
            .upsert(user_id, provider, &fingerprint(secret), bson_now())
            .await
    }

    async fn presence(&self, user_id: &str) -> Result<CredentialPresence> {
        let records = self.credentials.list_for_user(user_id).await?;
        Ok(records
            .into_iter()
            .map(CredentialRecord::from)
            .map(|r| (r.provider, true))
            .collect())
    }

    async fn delete(&self, user_id: &str, provider: ProviderId) -> Result<()> {
        self.credentials.delete(user_id, provider).await
    }
}

#[async_trait]
impl UserStore for MongoStore {
    async fn create_user(&self, new: NewUser) -> Result<User> {
        let user = new.into_user(Utc::now());
        if self.users.get(&user.id).await?.is_some() {
            return Err(PersistError::UserExists(user.id));
        }
        self.users.insert(&MongoUser::from(user.clone())).await?;
        self.stats
            .insert(&MongoUserStats::from(UserStats::zeroed(user.id.clone())))
            .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users = self.users.list().await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.users.get(user_id).await?.map(Into::into))
    }

    async fn update_user(&self, user_id: &str, update: UserUpdate) -> Result<User> {
        let mut set = Document::new();
        if let Some(name) = update.name {
            set.insert("name", name);
        }
        if let Some(role) = update.role {
            set.insert("role", bson::to_bson(&role)?);
        }
        if let Some(status) = update.status {
            set.insert("status", bson::to_bson(&status)?);
        }
        if set.is_empty() {
            return self
                .get_user(user_id)
                .await?
                .ok_or_else(|| PersistError::UserNotFound(user_id.to_string()));
        }

        self.users
            .update(user_id, set)
            .await?
            .map(Into::into)
            .ok_or_else(|| PersistError::UserNotFound(user_id.to_string()))
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.stats.delete(user_id).await?;
        if self.users.delete(user_id).await? == 0 {
            return Err(PersistError::UserNotFound(user_id.to_string()));
        }
        Ok(())
    }

    async fn record_login(&self, user_id: &str, at: DateTime<Utc>) -> Result<User> {
        let at = bson::DateTime::from_chrono(at);
        let user = self
            .users
            .update(user_id, doc! { "last_login": at })
            .await?
            .ok_or_else(|| PersistError::UserNotFound(user_id.to_string()))?;

        self.stats
            .modify(user_id, doc! { "$inc": { "session_count": 1_i64 } })
            .await?;
        Ok(user.into())
    }

    async fn get_stats(&self, user_id: &str) -> Result<Option<UserStats>> {
        Ok(self.stats.get(user_id).await?.map(Into::into))
    }

    async fn update_stats(&self, user_id: &str, update: StatsUpdate) -> Result<UserStats> {
        let mut set = Document::new();
        if let Some(count) = update.session_count {
            set.insert("session_count", count as i64);
        }
        if let Some(minutes) = update.total_usage_time {
            set.insert("total_usage_time", minutes as i64);
        }
        if let Some(model) = update.favorite_model {
            set.insert("favorite_model", model);
        }
        if let Some(at) = update.last_activity {
            set.insert("last_activity", bson::DateTime::from_chrono(at));
        }
        if let Some(sent) = update.messages_sent {
            set.insert("messages_sent", sent as i64);
        }

        let updated = if set.is_empty() {
            self.stats.get(user_id).await?
        } else {
            self.stats.modify(user_id, doc! { "$set": set }).await?
        };
        updated
            .map(Into::into)
            .ok_or_else(|| PersistError::UserNotFound(user_id.to_string()))
    }

    async fn record_message_sent(
        &self,
        user_id: &str,
        model_id: &str,
        at: DateTime<Utc>,
    ) -> Result<UserStats> {
        let update = doc! {
            "$inc": { "messages_sent": 1_i64 },
            "$set": {
                "last_activity": bson::DateTime::from_chrono(at),
                "favorite_model": model_id,
            },
        };
        self.stats
            .modify(user_id, update)
            .await?
            .map(Into::into)
            .ok_or_else(|| PersistError::UserNotFound(user_id.to_string()))
    }

    async fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardStats> {
        let users: Vec<User> = self.list_users().await?;
        let stats: Vec<UserStats> = self
            .stats
            .list()
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        let model_counts = self.messages.count_by_model().await?;

        Ok(dashboard::aggregate(now, &users, &stats, model_counts))
    }
}
