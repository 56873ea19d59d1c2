use axum::Json;
use utoipa::OpenApi;

use crate::routes::{admin, conversations, credentials, health, messages, models, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parley API",
        description = "Multi-provider AI chat: model catalog, conversations, provider dispatch and admin dashboard"
    ),
    paths(
        health::health_check,
        models::list_models,
        models::get_model,
        conversations::create_conversation,
        conversations::list_conversations,
        conversations::get_conversation,
        conversations::update_conversation,
        conversations::delete_conversation,
        messages::list_messages,
        messages::send_message,
        credentials::save_credential,
        credentials::list_credentials,
        credentials::delete_credential,
        users::register_user,
        users::record_login,
        admin::list_users,
        admin::get_user,
        admin::update_user,
        admin::delete_user,
        admin::get_user_stats,
        admin::dashboard,
    ),
    components(schemas(
        health::HealthResponse,
        models::ModelResponse,
        conversations::CreateConversationRequest,
        conversations::UpdateConversationRequest,
        conversations::ConversationResponse,
        messages::MessageResponse,
        messages::SendMessageRequest,
        messages::SendMessageResponse,
        credentials::SaveCredentialRequest,
        credentials::CredentialPresenceResponse,
        users::RegisterUserRequest,
        users::UserResponse,
        users::UserStatsResponse,
        admin::UpdateUserRequest,
        admin::ModelUsageResponse,
        admin::DailySignupsResponse,
        admin::DashboardResponse,
    )),
    tags(
        (name = "health", description = "Service status"),
        (name = "models", description = "Model catalog"),
        (name = "conversations", description = "Conversation management"),
        (name = "messages", description = "Transcripts and chat turns"),
        (name = "credentials", description = "Per-user provider keys"),
        (name = "users", description = "Profiles and sign-ins"),
        (name = "admin", description = "User administration and dashboard")
    )
)]
pub struct ApiDoc;

/// Serve the generated OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
