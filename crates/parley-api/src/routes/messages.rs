use axum::{extract::State, http::HeaderMap};
use chrono::{DateTime, Utc};
use parley_llm::ChatMessage;
use parley_persist::{NewMessage, StoredMessage};
use parley_types::find_model;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::conversations::{load_owned, require_user_id, OwnerQuery};
use crate::{
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
    resolve::resolve_credential,
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub id: String,
    pub conversation_id: String,
    /// user, assistant or system
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl MessageResponse {
    fn new(conversation_id: &str, message: ChatMessage) -> Self {
        Self {
            id: message.id,
            conversation_id: conversation_id.to_string(),
            role: message.role.as_str().to_string(),
            content: message.content,
            timestamp: message.timestamp,
            model: message.model,
        }
    }
}

impl From<StoredMessage> for MessageResponse {
    fn from(stored: StoredMessage) -> Self {
        Self::new(&stored.conversation_id, stored.message)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub user_id: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMessageResponse {
    pub user_message: MessageResponse,
    pub assistant_message: MessageResponse,
}

/// List messages in a conversation, oldest first
#[utoipa::path(
    get,
    path = "/conversations/{conversation_id}/messages",
    params(
        ("conversation_id" = String, Path, description = "Conversation ID"),
        ("user_id" = String, Query, description = "Owner of the conversation")
    ),
    responses(
        (status = 200, description = "Transcript", body = [MessageResponse]),
        (status = 404, description = "Conversation not found")
    ),
    tag = "messages"
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    load_owned(&state, &conversation_id, &query.user_id).await?;
    let messages = state.conversations.messages(&conversation_id).await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// Send one user turn and get the assistant's reply
///
/// The reply comes from the conversation's provider, or is simulated when no
/// credential is available. Provider failures return 502 with the upstream message.
#[utoipa::path(
    post,
    path = "/conversations/{conversation_id}/messages",
    params(
        ("conversation_id" = String, Path, description = "Conversation ID"),
        ("x-provider-key" = Option<String>, Header, description = "Provider key for this turn")
    ),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "User message and assistant reply", body = SendMessageResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Conversation not found"),
        (status = 502, description = "Provider error")
    ),
    tag = "messages"
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<Json<SendMessageResponse>> {
    let user_id = require_user_id(&req.user_id)?;
    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest("content must not be empty".to_string()));
    }

    let conversation = load_owned(&state, &conversation_id, user_id).await?;
    let provider = conversation.provider;
    let model_name = find_model(&conversation.model_id)
        .map(|m| m.name)
        .unwrap_or(conversation.model_id.as_str());

    let mut transcript: Vec<ChatMessage> = state
        .conversations
        .messages(&conversation_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    // The turn still goes out if the user message cannot be saved
    let user_message = match state
        .conversations
        .append(NewMessage::user(&conversation_id, content))
        .await
    {
        Ok(stored) => stored.message,
        Err(e) => {
            tracing::warn!(conversation_id = %conversation_id, "Failed to save user message: {}", e);
            ChatMessage::user(content)
        }
    };
    transcript.push(user_message.clone());

    let credential = resolve_credential(&state, &headers, user_id, provider).await;
    if let Some((_, source)) = &credential {
        tracing::debug!(provider = %provider, source = ?source, "Resolved provider credential");
    }

    tracing::info!(
        conversation_id = %conversation_id,
        provider = %provider,
        model = %model_name,
        turns = transcript.len(),
        "Dispatching turn"
    );

    let reply = state
        .dispatcher
        .dispatch(
            provider,
            &transcript,
            credential.as_ref().map(|(key, _)| key.as_str()),
        )
        .await?;

    let assistant_message = match state
        .conversations
        .append(NewMessage::assistant(
            &conversation_id,
            reply.as_str(),
            conversation.model_id.as_str(),
        ))
        .await
    {
        Ok(stored) => stored.message,
        Err(e) => {
            tracing::error!(conversation_id = %conversation_id, "Failed to save assistant reply: {}", e);
            ChatMessage::assistant(reply).with_model(conversation.model_id.clone())
        }
    };

    if let Err(e) = state
        .users
        .record_message_sent(user_id, &conversation.model_id, Utc::now())
        .await
    {
        tracing::debug!(user_id = %user_id, "Usage stats not updated: {}", e);
    }

    Ok(Json(SendMessageResponse {
        user_message: MessageResponse::new(&conversation_id, user_message),
        assistant_message: MessageResponse::new(&conversation_id, assistant_message),
    }))
}
