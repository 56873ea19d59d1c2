use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parley_types::MessageRole;
use std::collections::HashMap;

use super::MemoryStore;
use crate::dashboard;
use crate::error::{PersistError, Result};
use crate::models::{DashboardStats, NewUser, StatsUpdate, User, UserStats, UserUpdate};
use crate::traits::UserStore;

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<User> {
        let user = new.into_user(Utc::now());
        let mut state = self.state.write().await;
        if state.users.contains_key(&user.id) {
            return Err(PersistError::UserExists(user.id));
        }
        state
            .stats
            .insert(user.id.clone(), UserStats::zeroed(user.id.clone()));
        state.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(user_id).cloned())
    }

    async fn update_user(&self, user_id: &str, update: UserUpdate) -> Result<User> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(user_id)
            .ok_or_else(|| PersistError::UserNotFound(user_id.to_string()))?;
        update.apply(user);
        Ok(user.clone())
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.stats.remove(user_id);
        state
            .users
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| PersistError::UserNotFound(user_id.to_string()))
    }

    async fn record_login(&self, user_id: &str, at: DateTime<Utc>) -> Result<User> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(user_id)
            .ok_or_else(|| PersistError::UserNotFound(user_id.to_string()))?;
        user.last_login = Some(at);
        let user = user.clone();

        state
            .stats
            .entry(user_id.to_string())
            .or_insert_with(|| UserStats::zeroed(user_id))
            .session_count += 1;
        Ok(user)
    }

    async fn get_stats(&self, user_id: &str) -> Result<Option<UserStats>> {
        let state = self.state.read().await;
        Ok(state.stats.get(user_id).cloned())
    }

    async fn update_stats(&self, user_id: &str, update: StatsUpdate) -> Result<UserStats> {
        let mut state = self.state.write().await;
        let stats = state
            .stats
            .get_mut(user_id)
            .ok_or_else(|| PersistError::UserNotFound(user_id.to_string()))?;
        update.apply(stats);
        Ok(stats.clone())
    }

    async fn record_message_sent(
        &self,
        user_id: &str,
        model_id: &str,
        at: DateTime<Utc>,
    ) -> Result<UserStats> {
        let mut state = self.state.write().await;
        let stats = state
            .stats
            .get_mut(user_id)
            .ok_or_else(|| PersistError::UserNotFound(user_id.to_string()))?;
        stats.messages_sent += 1;
        stats.last_activity = Some(at);
        stats.favorite_model = Some(model_id.to_string());
        Ok(stats.clone())
    }

    async fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardStats> {
        let state = self.state.read().await;
        let users: Vec<User> = state.users.values().cloned().collect();
        let stats: Vec<UserStats> = state.stats.values().cloned().collect();

        let mut model_counts: HashMap<String, u64> = HashMap::new();
        for message in state.messages.values().flatten() {
            if message.role() != MessageRole::Assistant {
                continue;
            }
            if let Some(model) = &message.message.model {
                *model_counts.entry(model.clone()).or_insert(0) += 1;
            }
        }

        Ok(dashboard::aggregate(now, &users, &stats, model_counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserStatus;

    #[tokio::test]
    async fn test_create_user_adds_zeroed_stats() {
        let store = MemoryStore::new();
        let user = store
            .create_user(NewUser::new("ana@example.com", "Ana"))
            .await
            .unwrap();

        let stats = store.get_stats(&user.id).await.unwrap().unwrap();
        assert_eq!(stats.session_count, 0);
        assert_eq!(stats.messages_sent, 0);
        assert_eq!(user.status, UserStatus::Active);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = MemoryStore::new();
        store
            .create_user(NewUser::new("a@example.com", "A").with_id("u1"))
            .await
            .unwrap();
        let err = store
            .create_user(NewUser::new("b@example.com", "B").with_id("u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, PersistError::UserExists(id) if id == "u1"));
    }

    #[tokio::test]
    async fn test_record_login_counts_sessions() {
        let store = MemoryStore::new();
        let user = store
            .create_user(NewUser::new("a@example.com", "A"))
            .await
            .unwrap();
        let at = Utc::now();

        store.record_login(&user.id, at).await.unwrap();
        let user = store.record_login(&user.id, at).await.unwrap();

        assert_eq!(user.last_login, Some(at));
        let stats = store.get_stats(&user.id).await.unwrap().unwrap();
        assert_eq!(stats.session_count, 2);
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let store = MemoryStore::new();
        assert!(store.delete_user("ghost").await.unwrap_err().is_not_found());
    }
}
