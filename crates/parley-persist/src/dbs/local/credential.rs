use async_trait::async_trait;
use parley_types::ProviderId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::error::{PersistError, Result};
use crate::models::CredentialPresence;
use crate::traits::CredentialStore;

pub const LOCAL_KEY_PREFIX: &str = "apiKey_";

/// Raw secrets for one user, keyed `apiKey_<provider>`
type UserEntries = BTreeMap<String, String>;

/// Dev-mode credential storage
///
/// Keeps raw secrets in a JSON file (or only in memory) shaped as
/// `{ "<user_id>": { "apiKey_<provider>": "<secret>" } }`. Weaker than the
/// hashed stores and only meant for running without a database.
pub struct LocalCredentialStore {
    path: Option<PathBuf>,
    entries: RwLock<BTreeMap<String, UserEntries>>,
}

impl LocalCredentialStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Load `path` if it exists; it is created on first save
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                PersistError::LocalStorage(format!("Invalid file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(PersistError::LocalStorage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            path: Some(path),
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn key_for(provider: ProviderId) -> String {
        format!("{}{}", LOCAL_KEY_PREFIX, provider.as_str())
    }

    /// Raw secret `user_id` saved for `provider`
    pub async fn secret_for(&self, user_id: &str, provider: ProviderId) -> Option<String> {
        self.entries
            .read()
            .await
            .get(user_id)
            .and_then(|keys| keys.get(&Self::key_for(provider)))
            .cloned()
    }

    async fn flush(&self, entries: &BTreeMap<String, UserEntries>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PersistError::LocalStorage(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| PersistError::LocalStorage(e.to_string()))?;
        tokio::fs::write(path, raw)
            .await
            .map_err(|e| PersistError::LocalStorage(format!("Failed to write {}: {}", path.display(), e)))
    }
}

#[async_trait]
impl CredentialStore for LocalCredentialStore {
    async fn save(&self, user_id: &str, provider: ProviderId, secret: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        next.entry(user_id.to_string())
            .or_default()
            .insert(Self::key_for(provider), secret.trim().to_string());

        // Only visible once it is on disk
        self.flush(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn presence(&self, user_id: &str) -> Result<CredentialPresence> {
        let entries = self.entries.read().await;
        let Some(keys) = entries.get(user_id) else {
            return Ok(CredentialPresence::new());
        };
        Ok(ProviderId::ALL
            .into_iter()
            .filter(|p| keys.contains_key(&Self::key_for(*p)))
            .map(|p| (p, true))
            .collect())
    }

    async fn delete(&self, user_id: &str, provider: ProviderId) -> Result<()> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        let Some(keys) = next.get_mut(user_id) else {
            return Ok(());
        };
        if keys.remove(&Self::key_for(provider)).is_none() {
            return Ok(());
        }
        if keys.is_empty() {
            next.remove(user_id);
        }

        self.flush(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn secret(&self, user_id: &str, provider: ProviderId) -> Result<Option<String>> {
        Ok(self.secret_for(user_id, provider).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("parley-local-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[tokio::test]
    async fn test_keys_are_scoped_per_user() {
        let store = LocalCredentialStore::in_memory();
        store.save("alice", ProviderId::Anthropic, "ak").await.unwrap();

        assert!(store.presence("bob").await.unwrap().is_empty());
        assert_eq!(store.secret("bob", ProviderId::Anthropic).await.unwrap(), None);

        let presence = store.presence("alice").await.unwrap();
        assert_eq!(presence.get(&ProviderId::Anthropic), Some(&true));
        assert_eq!(
            store.secret("alice", ProviderId::Anthropic).await.unwrap().as_deref(),
            Some("ak")
        );

        store.delete("bob", ProviderId::Anthropic).await.unwrap();
        assert!(store.secret_for("alice", ProviderId::Anthropic).await.is_some());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_unchanged() {
        let dir = std::env::temp_dir().join(format!("parley-local-{}", uuid::Uuid::new_v4()));
        let blocker = dir.join("blocker");
        tokio::fs::create_dir_all(&blocker).await.unwrap();
        let path = blocker.join("keys.json");

        let store = LocalCredentialStore::open(&path).await.unwrap();
        store.save("alice", ProviderId::Cohere, "co-1").await.unwrap();

        // A regular file where the parent directory should be makes every write fail
        tokio::fs::remove_dir_all(&blocker).await.unwrap();
        tokio::fs::write(&blocker, "").await.unwrap();

        assert!(store.save("alice", ProviderId::OpenAI, "sk-alice").await.is_err());
        let presence = store.presence("alice").await.unwrap();
        assert_eq!(presence.get(&ProviderId::OpenAI), None);
        assert_eq!(store.secret_for("alice", ProviderId::OpenAI).await, None);

        assert!(store.delete("alice", ProviderId::Cohere).await.is_err());
        assert_eq!(
            store.secret_for("alice", ProviderId::Cohere).await.as_deref(),
            Some("co-1")
        );
    }

    #[tokio::test]
    async fn test_persists_prefixed_keys() {
        let path = temp_file("keys.json");
        let store = LocalCredentialStore::open(&path).await.unwrap();
        store.save("u", ProviderId::OpenAI, "sk-local").await.unwrap();

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        let entries: BTreeMap<String, UserEntries> = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            entries["u"].get("apiKey_openai").map(String::as_str),
            Some("sk-local")
        );

        let reopened = LocalCredentialStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.secret_for("u", ProviderId::OpenAI).await.as_deref(),
            Some("sk-local")
        );

        reopened.delete("u", ProviderId::OpenAI).await.unwrap();
        assert!(reopened.presence("u").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = LocalCredentialStore::in_memory();
        assert!(store.delete("u", ProviderId::Cohere).await.is_ok());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let path = temp_file("broken.json");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "not json").await.unwrap();

        let err = LocalCredentialStore::open(&path).await.err().unwrap();
        assert!(matches!(err, PersistError::LocalStorage(_)));
    }
}
