use async_trait::async_trait;
use chrono::Utc;
use parley_types::ProviderId;

use super::MemoryStore;
use crate::error::Result;
use crate::fingerprint::fingerprint;
use crate::models::{CredentialPresence, CredentialRecord};
use crate::traits::CredentialStore;

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn save(&self, user_id: &str, provider: ProviderId, secret: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let key_hash = fingerprint(secret);
        let now = Utc::now();

        state
            .credentials
            .entry((user_id.to_string(), provider))
            .and_modify(|record| {
                record.key_hash = key_hash.clone();
                record.created_at = now;
            })
            .or_insert_with(|| CredentialRecord {
                id: uuid::Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                provider,
                key_hash: key_hash.clone(),
                created_at: now,
            });
        Ok(())
    }

    async fn presence(&self, user_id: &str) -> Result<CredentialPresence> {
        let state = self.state.read().await;
        Ok(state
            .credentials
            .values()
            .filter(|r| r.user_id == user_id)
            .map(|r| (r.provider, true))
            .collect())
    }

    async fn delete(&self, user_id: &str, provider: ProviderId) -> Result<()> {
        let mut state = self.state.write().await;
        state.credentials.remove(&(user_id.to_string(), provider));
        Ok(())
    }
}

impl MemoryStore {
    /// Stored record for (user, provider)
    pub async fn credential_record(
        &self,
        user_id: &str,
        provider: ProviderId,
    ) -> Option<CredentialRecord> {
        let state = self.state.read().await;
        state
            .credentials
            .get(&(user_id.to_string(), provider))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_only_fingerprint_is_stored() {
        let store = MemoryStore::new();
        store.save("u1", ProviderId::OpenAI, "sk-secret").await.unwrap();

        let record = store.credential_record("u1", ProviderId::OpenAI).await.unwrap();
        assert_eq!(record.key_hash, fingerprint("sk-secret"));
        assert!(!record.key_hash.contains("sk-secret"));
        assert_eq!(store.secret("u1", ProviderId::OpenAI).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_upserts_one_record() {
        let store = MemoryStore::new();
        store.save("u1", ProviderId::Cohere, "first").await.unwrap();
        let first = store.credential_record("u1", ProviderId::Cohere).await.unwrap();
        store.save("u1", ProviderId::Cohere, "second").await.unwrap();
        let second = store.credential_record("u1", ProviderId::Cohere).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.key_hash, fingerprint("second"));
        assert!(second.created_at >= first.created_at);
        assert_eq!(store.presence("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_presence_is_per_user() {
        let store = MemoryStore::new();
        store.save("u1", ProviderId::Gemini, "g").await.unwrap();

        assert_eq!(
            store.presence("u1").await.unwrap().get(&ProviderId::Gemini),
            Some(&true)
        );
        assert!(store.presence("u2").await.unwrap().is_empty());
    }
}
