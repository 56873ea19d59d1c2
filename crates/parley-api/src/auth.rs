use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use parley_persist::User;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the caller's user id
///
/// Parley does no authentication of its own. The header is trusted as-is, so
/// it must be set by an upstream identity proxy that strips any client-supplied
/// value; exposed directly, anyone knowing an admin's id can act as that admin.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor that only admits callers whose profile has the admin role
///
/// Identity comes from [`USER_ID_HEADER`], which is assumed to be set by a
/// trusted upstream identity proxy.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::Forbidden(format!("missing {} header", USER_ID_HEADER)))?;

        let user = state
            .users
            .get_user(user_id)
            .await?
            .filter(|u| u.is_admin())
            .ok_or_else(|| ApiError::Forbidden("admin role required".to_string()))?;

        Ok(AdminUser(user))
    }
}
