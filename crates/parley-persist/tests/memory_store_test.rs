use chrono::{Duration, Utc};
use parley_persist::{
    ConversationStore, ConversationUpdate, CredentialStore, MemoryStore, NewConversation,
    NewMessage, NewUser, StatsUpdate, UserRole, UserStatus, UserStore, UserUpdate,
};
use parley_types::{MessageRole, ProviderId};
use std::sync::Arc;

async fn conversation(store: &MemoryStore, user: &str) -> String {
    store
        .create(NewConversation::new(user, "New chat", "gpt", ProviderId::OpenAI))
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_append_keeps_insertion_order_and_bumps_updated_at() {
    let store = MemoryStore::new();
    let id = conversation(&store, "alice").await;

    store.append(NewMessage::user(&id, "Hello")).await.unwrap();
    store
        .append(NewMessage::assistant(&id, "Hi!", "gpt"))
        .await
        .unwrap();

    let messages = store.messages(&id).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content(), "Hello");
    assert_eq!(messages[0].role(), MessageRole::User);
    assert_eq!(messages[1].content(), "Hi!");
    assert_eq!(messages[1].message.model.as_deref(), Some("gpt"));

    let conversation = store.get(&id, "alice").await.unwrap().unwrap();
    assert!(conversation.updated_at >= conversation.created_at);
}

#[tokio::test]
async fn test_delete_removes_messages() {
    let store = MemoryStore::new();
    let id = conversation(&store, "alice").await;
    store.append(NewMessage::user(&id, "Hello")).await.unwrap();

    ConversationStore::delete(&store, &id).await.unwrap();

    assert!(store.messages(&id).await.unwrap().is_empty());
    assert!(store.get(&id, "alice").await.unwrap().is_none());
    assert!(ConversationStore::delete(&store, &id)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_list_most_recently_updated_first() {
    let store = MemoryStore::new();
    let first = conversation(&store, "alice").await;
    let second = conversation(&store, "alice").await;
    conversation(&store, "bob").await;

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    store.append(NewMessage::user(&first, "bump")).await.unwrap();

    let ids: Vec<String> = store
        .list("alice")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[tokio::test]
async fn test_update_changes_model() {
    let store = MemoryStore::new();
    let id = conversation(&store, "alice").await;

    let updated = store
        .update(
            &id,
            ConversationUpdate {
                model_id: Some("claude".to_string()),
                provider: Some(ProviderId::Anthropic),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.model_id, "claude");
    assert_eq!(updated.provider, ProviderId::Anthropic);
    assert_eq!(updated.title, "New chat");
}

#[tokio::test]
async fn test_credential_presence_round_trip() {
    let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::new());

    store.save("u1", ProviderId::Gemini, "g-key").await.unwrap();
    let presence = store.presence("u1").await.unwrap();
    assert_eq!(presence.get(&ProviderId::Gemini), Some(&true));

    store.delete("u1", ProviderId::Gemini).await.unwrap();
    assert!(store.presence("u1").await.unwrap().is_empty());

    // Deleting again is fine
    store.delete("u1", ProviderId::Gemini).await.unwrap();
}

#[tokio::test]
async fn test_user_lifecycle() {
    let store = MemoryStore::new();
    let user = store
        .create_user(NewUser::new("ana@example.com", "Ana").with_id("ana"))
        .await
        .unwrap();
    store
        .create_user(NewUser::new("root@example.com", "Root").with_role(UserRole::Admin))
        .await
        .unwrap();

    let users = store.list_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert!(users[0].created_at >= users[1].created_at);

    let updated = store
        .update_user(
            &user.id,
            UserUpdate {
                status: Some(UserStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, UserStatus::Inactive);
    assert_eq!(updated.name, "Ana");

    let stats = store
        .update_stats(
            &user.id,
            StatsUpdate {
                total_usage_time: Some(42),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(stats.total_usage_time, 42);

    store.delete_user(&user.id).await.unwrap();
    assert!(store.get_user(&user.id).await.unwrap().is_none());
    assert!(store.get_stats(&user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_record_message_sent() {
    let store = MemoryStore::new();
    store
        .create_user(NewUser::new("a@example.com", "A").with_id("a"))
        .await
        .unwrap();
    let at = Utc::now();

    store.record_message_sent("a", "gpt", at).await.unwrap();
    let stats = store.record_message_sent("a", "claude", at).await.unwrap();

    assert_eq!(stats.messages_sent, 2);
    assert_eq!(stats.favorite_model.as_deref(), Some("claude"));
    assert_eq!(stats.last_activity, Some(at));
    assert!(store
        .record_message_sent("ghost", "gpt", at)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_dashboard_over_memory_store() {
    let store = MemoryStore::new();
    let now = Utc::now();

    store
        .create_user(NewUser::new("a@example.com", "A").with_id("a"))
        .await
        .unwrap();
    store
        .create_user(NewUser::new("b@example.com", "B").with_id("b"))
        .await
        .unwrap();
    store.record_login("a", now - Duration::hours(1)).await.unwrap();
    store
        .update_stats(
            "a",
            StatsUpdate {
                total_usage_time: Some(30),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let id = conversation(&store, "a").await;
    store.append(NewMessage::user(&id, "q1")).await.unwrap();
    store
        .append(NewMessage::assistant(&id, "r1", "claude"))
        .await
        .unwrap();
    store
        .append(NewMessage::assistant(&id, "r2", "claude"))
        .await
        .unwrap();
    store
        .append(NewMessage::assistant(&id, "r3", "gpt"))
        .await
        .unwrap();

    let dashboard = store.dashboard(now).await.unwrap();
    assert_eq!(dashboard.total_users, 2);
    assert_eq!(dashboard.active_users, 1);
    assert_eq!(dashboard.user_growth.iter().map(|d| d.count).sum::<u64>(), 2);
    assert_eq!(dashboard.average_session_time, "30.0");
    assert_eq!(dashboard.model_usage.len(), 2);
    assert_eq!(dashboard.model_usage[0].model, "claude");
    assert_eq!(dashboard.model_usage[0].count, 2);
}
