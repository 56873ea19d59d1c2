use axum::{extract::State, http::StatusCode};
use parley_llm::ProviderId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;

use super::conversations::{require_user_id, OwnerQuery};
use crate::{
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveCredentialRequest {
    pub user_id: String,
    /// Provider secret. Only its fingerprint is kept by the hosted backend.
    pub key: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CredentialPresenceResponse {
    pub user_id: String,
    /// Every provider id with whether a credential is saved
    pub providers: BTreeMap<String, bool>,
}

fn parse_provider(raw: &str) -> ApiResult<ProviderId> {
    raw.parse::<ProviderId>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Save or replace the caller's key for a provider
#[utoipa::path(
    put,
    path = "/credentials/{provider}",
    params(
        ("provider" = String, Path, description = "Provider id (openai, gemini, anthropic, perplexity, cohere, lovable)")
    ),
    request_body = SaveCredentialRequest,
    responses(
        (status = 204, description = "Credential saved"),
        (status = 400, description = "Unknown provider or empty key")
    ),
    tag = "credentials"
)]
pub async fn save_credential(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    Json(req): Json<SaveCredentialRequest>,
) -> ApiResult<StatusCode> {
    let provider = parse_provider(&provider)?;
    let user_id = require_user_id(&req.user_id)?;
    if req.key.trim().is_empty() {
        return Err(ApiError::BadRequest("key must not be empty".to_string()));
    }

    state.credentials.save(user_id, provider, &req.key).await?;
    tracing::info!(provider = %provider, "Credential saved");
    Ok(StatusCode::NO_CONTENT)
}

/// Which providers the user has keys for
#[utoipa::path(
    get,
    path = "/credentials",
    params(
        ("user_id" = String, Query, description = "User ID")
    ),
    responses(
        (status = 200, description = "Credential presence per provider", body = CredentialPresenceResponse)
    ),
    tag = "credentials"
)]
pub async fn list_credentials(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<Json<CredentialPresenceResponse>> {
    let user_id = require_user_id(&query.user_id)?;
    let presence = state.credentials.presence(user_id).await?;

    let providers = ProviderId::ALL
        .into_iter()
        .map(|p| (p.as_str().to_string(), presence.get(&p).copied().unwrap_or(false)))
        .collect();

    Ok(Json(CredentialPresenceResponse {
        user_id: user_id.to_string(),
        providers,
    }))
}

/// Remove the caller's key for a provider
#[utoipa::path(
    delete,
    path = "/credentials/{provider}",
    params(
        ("provider" = String, Path, description = "Provider id"),
        ("user_id" = String, Query, description = "User ID")
    ),
    responses(
        (status = 204, description = "Credential removed (or was never saved)"),
        (status = 400, description = "Unknown provider")
    ),
    tag = "credentials"
)]
pub async fn delete_credential(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> ApiResult<StatusCode> {
    let provider = parse_provider(&provider)?;
    let user_id = require_user_id(&query.user_id)?;

    state.credentials.delete(user_id, provider).await?;
    Ok(StatusCode::NO_CONTENT)
}
