mod conversation;
mod credential;
mod message;
mod user;

pub use conversation::MongoConversationRepository;
pub use credential::MongoCredentialRepository;
pub use message::MongoMessageRepository;
pub use user::{MongoStatsRepository, MongoUserRepository};
