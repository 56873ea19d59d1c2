use axum::{extract::State, http::StatusCode};
use chrono::{NaiveDate, Utc};
use parley_persist::{DailySignups, DashboardStats, ModelUsage, UserRole, UserStatus, UserUpdate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::users::{UserResponse, UserStatsResponse};
use crate::{
    auth::AdminUser,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// user or admin
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub role: Option<UserRole>,
    /// active or inactive
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub status: Option<UserStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModelUsageResponse {
    pub model: String,
    pub count: u64,
}

impl From<ModelUsage> for ModelUsageResponse {
    fn from(usage: ModelUsage) -> Self {
        Self {
            model: usage.model,
            count: usage.count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailySignupsResponse {
    pub date: NaiveDate,
    /// Short weekday name
    pub day: String,
    pub count: u64,
}

impl From<DailySignups> for DailySignupsResponse {
    fn from(signups: DailySignups) -> Self {
        Self {
            date: signups.date,
            day: signups.day,
            count: signups.count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub total_users: u64,
    /// Active status and a login within the last 7 days
    pub active_users: u64,
    /// Signups per day over the last 7 days, oldest first
    pub user_growth: Vec<DailySignupsResponse>,
    /// Minutes per session, one decimal
    pub average_session_time: String,
    /// Assistant messages per model, most used first
    pub model_usage: Vec<ModelUsageResponse>,
}

impl From<DashboardStats> for DashboardResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_users: stats.total_users,
            active_users: stats.active_users,
            user_growth: stats.user_growth.into_iter().map(Into::into).collect(),
            average_session_time: stats.average_session_time,
            model_usage: stats.model_usage.into_iter().map(Into::into).collect(),
        }
    }
}

/// List every user, newest first
#[utoipa::path(
    get,
    path = "/admin/users",
    params(
        ("x-user-id" = String, Header, description = "Caller's user id; must be an admin")
    ),
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "admin"
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.users.list_users().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Get one user
#[utoipa::path(
    get,
    path = "/admin/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID"),
        ("x-user-id" = String, Header, description = "Caller's user id; must be an admin")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    ),
    tag = "admin"
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .get_user(&user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: {}", user_id)))?;
    Ok(Json(user.into()))
}

/// Change a user's name, role or status
#[utoipa::path(
    patch,
    path = "/admin/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID"),
        ("x-user-id" = String, Header, description = "Caller's user id; must be an admin")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    ),
    tag = "admin"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let update = UserUpdate {
        name: req.name.filter(|n| !n.trim().is_empty()),
        role: req.role,
        status: req.status,
    };
    let user = state.users.update_user(&user_id, update).await?;

    tracing::info!(admin_id = %admin.id, user_id = %user.id, "User updated");
    Ok(Json(user.into()))
}

/// Delete a user and their stats
#[utoipa::path(
    delete,
    path = "/admin/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID"),
        ("x-user-id" = String, Header, description = "Caller's user id; must be an admin")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Admins cannot delete themselves"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    ),
    tag = "admin"
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    if admin.id == user_id {
        return Err(ApiError::BadRequest("admins cannot delete themselves".to_string()));
    }
    state.users.delete_user(&user_id).await?;

    tracing::info!(admin_id = %admin.id, user_id = %user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Usage stats for one user
#[utoipa::path(
    get,
    path = "/admin/users/{user_id}/stats",
    params(
        ("user_id" = String, Path, description = "User ID"),
        ("x-user-id" = String, Header, description = "Caller's user id; must be an admin")
    ),
    responses(
        (status = 200, description = "Usage stats", body = UserStatsResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    ),
    tag = "admin"
)]
pub async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserStatsResponse>> {
    let stats = state
        .users
        .get_stats(&user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: {}", user_id)))?;
    Ok(Json(stats.into()))
}

/// Aggregated dashboard numbers
#[utoipa::path(
    get,
    path = "/admin/dashboard",
    params(
        ("x-user-id" = String, Header, description = "Caller's user id; must be an admin")
    ),
    responses(
        (status = 200, description = "Dashboard", body = DashboardResponse),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "admin"
)]
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> ApiResult<Json<DashboardResponse>> {
    let stats = state.users.dashboard(Utc::now()).await?;
    Ok(Json(stats.into()))
}
