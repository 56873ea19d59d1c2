use axum::{extract::State, Json};
use parley_llm::ProviderId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
    /// Providers the dispatcher can route to
    pub providers: Vec<String>,
}

/// Health check endpoint
///
/// Returns the health status of the API and its storage backend
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    let mut services = HashMap::new();

    let storage = match state.conversations.list("_health_check").await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!("Storage health check failed: {}", e);
            "disconnected"
        }
    };
    services.insert("storage".to_string(), storage.to_string());
    services.insert(
        "backend".to_string(),
        serde_json::to_value(state.backend)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default(),
    );
    services.insert(
        "credentials".to_string(),
        if state.local_credentials() { "local" } else { "hashed" }.to_string(),
    );

    let providers = ProviderId::ALL
        .into_iter()
        .filter(|p| state.dispatcher.supports(*p))
        .map(|p| p.as_str().to_string())
        .collect();

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
        providers,
    }))
}
