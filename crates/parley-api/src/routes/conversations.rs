use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use parley_persist::{Conversation, ConversationUpdate, NewConversation};
use parley_types::{find_model, AIModel};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateConversationRequest {
    pub user_id: String,
    pub model_id: String,
    /// Defaults to "Conversation with <model name>"
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateConversationRequest {
    pub user_id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Switching model also switches provider
    #[serde(default)]
    pub model_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConversationResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub model_id: String,
    pub provider: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Conversation> for ConversationResponse {
    fn from(conversation: Conversation) -> Self {
        Self {
            id: conversation.id,
            user_id: conversation.user_id,
            title: conversation.title,
            model_id: conversation.model_id,
            provider: conversation.provider.as_str().to_string(),
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: String,
}

pub(crate) fn require_model(model_id: &str) -> ApiResult<&'static AIModel> {
    find_model(model_id).ok_or_else(|| ApiError::BadRequest(format!("Unknown model: {}", model_id)))
}

pub(crate) fn require_user_id(user_id: &str) -> ApiResult<&str> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(ApiError::BadRequest("user_id is required".to_string()));
    }
    Ok(user_id)
}

/// Owner-scoped lookup shared by the conversation and message routes
pub(crate) async fn load_owned(
    state: &AppState,
    conversation_id: &str,
    user_id: &str,
) -> ApiResult<Conversation> {
    state
        .conversations
        .get(conversation_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Conversation not found: {}", conversation_id)))
}

/// Create a new conversation
#[utoipa::path(
    post,
    path = "/conversations",
    request_body = CreateConversationRequest,
    responses(
        (status = 201, description = "Conversation created", body = ConversationResponse),
        (status = 400, description = "Invalid request")
    ),
    tag = "conversations"
)]
pub async fn create_conversation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateConversationRequest>,
) -> ApiResult<(StatusCode, Json<ConversationResponse>)> {
    let user_id = require_user_id(&req.user_id)?;
    let model = require_model(&req.model_id)?;
    let title = req
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| format!("Conversation with {}", model.name));

    let conversation = state
        .conversations
        .create(NewConversation::new(user_id, title, model.id, model.provider_id))
        .await?;

    tracing::info!(
        conversation_id = %conversation.id,
        model = %conversation.model_id,
        "Conversation created"
    );

    Ok((StatusCode::CREATED, Json(conversation.into())))
}

/// List a user's conversations, most recently updated first
#[utoipa::path(
    get,
    path = "/conversations",
    params(
        ("user_id" = String, Query, description = "Owner of the conversations")
    ),
    responses(
        (status = 200, description = "List of conversations", body = [ConversationResponse]),
        (status = 400, description = "Invalid request")
    ),
    tag = "conversations"
)]
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<Json<Vec<ConversationResponse>>> {
    let user_id = require_user_id(&query.user_id)?;
    let conversations = state.conversations.list(user_id).await?;
    Ok(Json(conversations.into_iter().map(Into::into).collect()))
}

/// Get a specific conversation
#[utoipa::path(
    get,
    path = "/conversations/{conversation_id}",
    params(
        ("conversation_id" = String, Path, description = "Conversation ID"),
        ("user_id" = String, Query, description = "Owner of the conversation")
    ),
    responses(
        (status = 200, description = "Conversation details", body = ConversationResponse),
        (status = 404, description = "Conversation not found")
    ),
    tag = "conversations"
)]
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<Json<ConversationResponse>> {
    let conversation = load_owned(&state, &conversation_id, &query.user_id).await?;
    Ok(Json(conversation.into()))
}

/// Rename a conversation or switch its model
#[utoipa::path(
    patch,
    path = "/conversations/{conversation_id}",
    params(
        ("conversation_id" = String, Path, description = "Conversation ID")
    ),
    request_body = UpdateConversationRequest,
    responses(
        (status = 200, description = "Updated conversation", body = ConversationResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Conversation not found")
    ),
    tag = "conversations"
)]
pub async fn update_conversation(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
    Json(req): Json<UpdateConversationRequest>,
) -> ApiResult<Json<ConversationResponse>> {
    load_owned(&state, &conversation_id, &req.user_id).await?;

    let mut update = ConversationUpdate {
        title: req.title.filter(|t| !t.trim().is_empty()),
        ..Default::default()
    };
    if let Some(model_id) = &req.model_id {
        let model = require_model(model_id)?;
        update.model_id = Some(model.id.to_string());
        update.provider = Some(model.provider_id);
    }

    let conversation = state.conversations.update(&conversation_id, update).await?;
    Ok(Json(conversation.into()))
}

/// Delete a conversation and its messages
#[utoipa::path(
    delete,
    path = "/conversations/{conversation_id}",
    params(
        ("conversation_id" = String, Path, description = "Conversation ID"),
        ("user_id" = String, Query, description = "Owner of the conversation")
    ),
    responses(
        (status = 204, description = "Conversation deleted"),
        (status = 404, description = "Conversation not found")
    ),
    tag = "conversations"
)]
pub async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<StatusCode> {
    load_owned(&state, &conversation_id, &query.user_id).await?;
    state.conversations.delete(&conversation_id).await?;

    tracing::info!(conversation_id = %conversation_id, "Conversation deleted");
    Ok(StatusCode::NO_CONTENT)
}
