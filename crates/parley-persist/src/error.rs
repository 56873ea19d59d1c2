use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[cfg(feature = "mongodb")]
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[cfg(feature = "mongodb")]
    #[error("BSON serialization error: {0}")]
    BsonSerialization(#[from] bson::ser::Error),

    #[cfg(feature = "mongodb")]
    #[error("BSON deserialization error: {0}")]
    BsonDeserialization(#[from] bson::de::Error),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Local storage error: {0}")]
    LocalStorage(String),
}

impl PersistError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ConversationNotFound(_) | Self::UserNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, PersistError>;
