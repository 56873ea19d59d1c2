use bson::oid::ObjectId;
use bson::DateTime as BsonDateTime;
use parley_types::{ChatMessage, MessageRole, ProviderId};
use serde::{Deserialize, Serialize};

use crate::models::{
    Conversation, CredentialRecord, StoredMessage, User, UserRole, UserStats, UserStatus,
};

// Timestamps are stored as BSON dates so range filters and sorts work server-side.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConversation {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub model_id: String,
    pub provider: ProviderId,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

/// Messages keep an `ObjectId` key so insertion order survives timestamp ties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMessage {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub conversation_id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: BsonDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoCredential {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub provider: ProviderId,
    pub key_hash: String,
    pub created_at: BsonDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub last_login: Option<BsonDateTime>,
    pub created_at: BsonDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUserStats {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub session_count: i64,
    pub total_usage_time: i64,
    pub favorite_model: Option<String>,
    pub last_activity: Option<BsonDateTime>,
    pub messages_sent: i64,
}

// Conversions between database-agnostic and MongoDB-specific models

impl From<Conversation> for MongoConversation {
    fn from(c: Conversation) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            title: c.title,
            model_id: c.model_id,
            provider: c.provider,
            created_at: BsonDateTime::from_chrono(c.created_at),
            updated_at: BsonDateTime::from_chrono(c.updated_at),
        }
    }
}

impl From<MongoConversation> for Conversation {
    fn from(c: MongoConversation) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            title: c.title,
            model_id: c.model_id,
            provider: c.provider,
            created_at: c.created_at.to_chrono(),
            updated_at: c.updated_at.to_chrono(),
        }
    }
}

impl From<MongoMessage> for StoredMessage {
    fn from(m: MongoMessage) -> Self {
        Self {
            conversation_id: m.conversation_id,
            message: ChatMessage {
                id: m.id.to_hex(),
                role: m.role,
                content: m.content,
                timestamp: m.timestamp.to_chrono(),
                model: m.model,
            },
        }
    }
}

impl From<MongoCredential> for CredentialRecord {
    fn from(c: MongoCredential) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            provider: c.provider,
            key_hash: c.key_hash,
            created_at: c.created_at.to_chrono(),
        }
    }
}

impl From<User> for MongoUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role,
            status: u.status,
            last_login: u.last_login.map(BsonDateTime::from_chrono),
            created_at: BsonDateTime::from_chrono(u.created_at),
        }
    }
}

impl From<MongoUser> for User {
    fn from(u: MongoUser) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role,
            status: u.status,
            last_login: u.last_login.map(|at| at.to_chrono()),
            created_at: u.created_at.to_chrono(),
        }
    }
}

impl From<UserStats> for MongoUserStats {
    fn from(s: UserStats) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            session_count: s.session_count as i64,
            total_usage_time: s.total_usage_time as i64,
            favorite_model: s.favorite_model,
            last_activity: s.last_activity.map(BsonDateTime::from_chrono),
            messages_sent: s.messages_sent as i64,
        }
    }
}

impl From<MongoUserStats> for UserStats {
    fn from(s: MongoUserStats) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            session_count: s.session_count.max(0) as u64,
            total_usage_time: s.total_usage_time.max(0) as u64,
            favorite_model: s.favorite_model,
            last_activity: s.last_activity.map(|at| at.to_chrono()),
            messages_sent: s.messages_sent.max(0) as u64,
        }
    }
}
