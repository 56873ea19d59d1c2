// In-process backend: tests, demos, and the fallback when no database is configured.

mod conversation;
mod credential;
mod user;

use parley_types::ProviderId;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{Conversation, CredentialRecord, StoredMessage, User, UserStats};

#[derive(Default)]
struct MemoryState {
    conversations: HashMap<String, Conversation>,
    /// Insertion order per conversation
    messages: HashMap<String, Vec<StoredMessage>>,
    credentials: HashMap<(String, ProviderId), CredentialRecord>,
    users: HashMap<String, User>,
    /// Keyed by user id
    stats: HashMap<String, UserStats>,
}

/// Implements every store trait over one shared set of maps
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}
