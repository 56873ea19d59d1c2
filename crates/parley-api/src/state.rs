use parley_llm::ChatDispatch;
use parley_persist::{ConversationStore, CredentialStore, StorageBackend, Stores, UserStore};
use std::sync::Arc;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// Stores and the dispatcher sit behind traits so tests can swap them.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub conversations: Arc<dyn ConversationStore>,
    pub credentials: Arc<dyn CredentialStore>,
    pub users: Arc<dyn UserStore>,
    pub dispatcher: Arc<dyn ChatDispatch>,
    pub backend: StorageBackend,
}

impl AppState {
    pub fn new(config: Config, stores: Stores, dispatcher: Arc<dyn ChatDispatch>) -> Self {
        Self {
            config: Arc::new(config),
            conversations: stores.conversations,
            credentials: stores.credentials,
            users: stores.users,
            dispatcher,
            backend: stores.backend,
        }
    }

    /// Raw secrets from the credential store may be used for dispatch
    pub fn local_credentials(&self) -> bool {
        self.backend == StorageBackend::Local
    }
}
