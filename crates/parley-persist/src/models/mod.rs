mod conversation;
mod credential;
mod user;

pub use conversation::{Conversation, ConversationUpdate, NewConversation, NewMessage, StoredMessage};
pub use credential::{CredentialPresence, CredentialRecord};
pub use user::{
    DailySignups, DashboardStats, ModelUsage, NewUser, StatsUpdate, User, UserRole, UserStats, UserStatus,
    UserUpdate,
};
