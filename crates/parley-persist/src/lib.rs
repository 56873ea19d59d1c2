pub mod builder;
pub mod dashboard;
pub mod dbs;
pub mod error;
pub mod fingerprint;
pub mod models;
pub mod traits;

pub use builder::{StorageBackend, Stores, StoresBuilder};
pub use dbs::local::LocalCredentialStore;
pub use dbs::memory::MemoryStore;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoStore;
pub use error::{PersistError, Result};
pub use fingerprint::fingerprint;
pub use models::{
    Conversation, ConversationUpdate, CredentialPresence, CredentialRecord, DailySignups, DashboardStats,
    ModelUsage, NewConversation, NewMessage, NewUser, StatsUpdate, StoredMessage, User, UserRole,
    UserStats, UserStatus, UserUpdate,
};
pub use traits::{ConversationStore, CredentialStore, UserStore};
