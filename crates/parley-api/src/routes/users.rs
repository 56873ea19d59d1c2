use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use parley_persist::{NewUser, User, UserRole, UserStats};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult},
    extract::{Json, Path},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    /// Id from the identity provider; generated when absent
    #[serde(default)]
    pub id: Option<String>,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    /// user or admin
    pub role: String,
    /// active or inactive
    pub status: String,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            role: enum_str(&user.role),
            status: enum_str(&user.status),
            id: user.id,
            email: user.email,
            name: user.name,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserStatsResponse {
    pub user_id: String,
    pub session_count: u64,
    /// Minutes
    pub total_usage_time: u64,
    pub favorite_model: Option<String>,
    pub last_activity: Option<DateTime<Utc>>,
    pub messages_sent: u64,
}

impl From<UserStats> for UserStatsResponse {
    fn from(stats: UserStats) -> Self {
        Self {
            user_id: stats.user_id,
            session_count: stats.session_count,
            total_usage_time: stats.total_usage_time,
            favorite_model: stats.favorite_model,
            last_activity: stats.last_activity,
            messages_sent: stats.messages_sent,
        }
    }
}

/// Serialized name of a lowercase unit enum
pub(crate) fn enum_str<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Register a profile (and its stats row)
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "User already exists")
    ),
    tag = "users"
)]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let email = req.email.trim();
    if !email.contains('@') {
        return Err(ApiError::BadRequest("a valid email is required".to_string()));
    }
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }

    let role = if state.config.is_admin_email(email) {
        UserRole::Admin
    } else {
        UserRole::User
    };
    let mut new = NewUser::new(email, req.name.trim()).with_role(role);
    if let Some(id) = req.id.filter(|id| !id.trim().is_empty()) {
        new = new.with_id(id);
    }

    let user = state.users.create_user(new).await?;
    tracing::info!(user_id = %user.id, admin = user.is_admin(), "User registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Record a sign-in: sets last login and counts a session
#[utoipa::path(
    post,
    path = "/users/{user_id}/login",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn record_login(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.users.record_login(&user_id, Utc::now()).await?;
    Ok(Json(user.into()))
}
