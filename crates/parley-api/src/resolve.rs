use axum::http::HeaderMap;
use parley_llm::ProviderId;

use crate::state::AppState;

/// Header a client uses to pass its own provider key for one turn
pub const PROVIDER_KEY_HEADER: &str = "x-provider-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Header,
    Operator,
    LocalStore,
}

/// Outbound credential for one turn
///
/// Order: request header, operator key, then the dev-mode local store.
/// `None` means the turn is answered with a simulated reply.
pub async fn resolve_credential(
    state: &AppState,
    headers: &HeaderMap,
    user_id: &str,
    provider: ProviderId,
) -> Option<(String, CredentialSource)> {
    let from_header = headers
        .get(PROVIDER_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(key) = from_header {
        return Some((key.to_string(), CredentialSource::Header));
    }

    if let Some(key) = state.config.provider_key(provider) {
        return Some((key.to_string(), CredentialSource::Operator));
    }

    if !state.local_credentials() {
        return None;
    }
    match state.credentials.secret(user_id, provider).await {
        Ok(secret) => secret
            .filter(|s| !s.trim().is_empty())
            .map(|s| (s, CredentialSource::LocalStore)),
        Err(e) => {
            tracing::warn!(provider = %provider, "Failed to read local credential: {}", e);
            None
        }
    }
}
