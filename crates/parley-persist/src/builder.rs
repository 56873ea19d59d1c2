use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::dbs::local::LocalCredentialStore;
use crate::dbs::memory::MemoryStore;
use crate::error::Result;
use crate::traits::{ConversationStore, CredentialStore, UserStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Mongodb,
    /// In-process stores with local raw-value credentials
    Local,
}

/// The three stores the application needs, behind their traits
#[derive(Clone)]
pub struct Stores {
    pub conversations: Arc<dyn ConversationStore>,
    pub credentials: Arc<dyn CredentialStore>,
    pub users: Arc<dyn UserStore>,
    pub backend: StorageBackend,
}

impl Stores {
    /// Local fallback with credentials held in memory only
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            conversations: store.clone(),
            credentials: Arc::new(LocalCredentialStore::in_memory()),
            users: store,
            backend: StorageBackend::Local,
        }
    }

    /// Memory stores with hashed credentials, same shape as the hosted backend
    pub fn hashed_in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            conversations: store.clone(),
            credentials: store.clone(),
            users: store,
            backend: StorageBackend::Local,
        }
    }

    /// Whether raw secrets are stored locally
    pub fn local_credentials(&self) -> bool {
        self.backend == StorageBackend::Local
    }
}

pub struct StoresBuilder {
    mongodb_uri: Option<String>,
    database: String,
    local_credentials_path: Option<PathBuf>,
}

impl StoresBuilder {
    pub fn new() -> Self {
        Self {
            mongodb_uri: None,
            database: "parley".to_string(),
            local_credentials_path: None,
        }
    }

    /// Blank values count as unset
    pub fn mongodb_uri(mut self, uri: Option<String>) -> Self {
        self.mongodb_uri = uri.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = db.into();
        self
    }

    pub fn local_credentials_path(mut self, path: Option<PathBuf>) -> Self {
        self.local_credentials_path = path;
        self
    }

    /// MongoDB when a URI is configured, otherwise the local fallback
    pub async fn build(self) -> Result<Stores> {
        if let Some(uri) = &self.mongodb_uri {
            #[cfg(feature = "mongodb")]
            {
                let store = Arc::new(crate::dbs::mongo::MongoStore::connect(uri, &self.database).await?);
                tracing::info!(database = %self.database, "Using MongoDB storage");
                return Ok(Stores {
                    conversations: store.clone(),
                    credentials: store.clone(),
                    users: store,
                    backend: StorageBackend::Mongodb,
                });
            }

            #[cfg(not(feature = "mongodb"))]
            {
                let _ = uri;
                tracing::warn!("MONGODB_URI is set but this build has no mongodb support");
            }
        } else {
            tracing::warn!("MONGODB_URI not configured");
        }

        self.build_local().await
    }

    async fn build_local(self) -> Result<Stores> {
        let credentials = match &self.local_credentials_path {
            Some(path) => LocalCredentialStore::open(path).await?,
            None => LocalCredentialStore::in_memory(),
        };

        tracing::warn!(
            credentials_file = ?credentials.path(),
            "Falling back to local storage: conversations are kept in memory and provider \
             keys are stored unhashed"
        );

        let store = Arc::new(MemoryStore::new());
        Ok(Stores {
            conversations: store.clone(),
            credentials: Arc::new(credentials),
            users: store,
            backend: StorageBackend::Local,
        })
    }
}

impl Default for StoresBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::ProviderId;

    #[tokio::test]
    async fn test_without_uri_falls_back_to_local() {
        let stores = StoresBuilder::new()
            .mongodb_uri(Some("   ".to_string()))
            .build()
            .await
            .unwrap();
        assert_eq!(stores.backend, StorageBackend::Local);
        assert!(stores.local_credentials());

        stores
            .credentials
            .save("u", ProviderId::Perplexity, "pplx")
            .await
            .unwrap();
        assert_eq!(
            stores
                .credentials
                .secret("u", ProviderId::Perplexity)
                .await
                .unwrap()
                .as_deref(),
            Some("pplx")
        );
    }
}
