use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    middleware::logging,
    openapi,
    routes::{admin, conversations, credentials, health, messages, models, users},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health & docs
        .route("/health", get(health::health_check))
        .route("/api/openapi.json", get(openapi::openapi_json))
        // Model catalog
        .route("/models", get(models::list_models))
        .route("/models/:model_id", get(models::get_model))
        // Conversations
        .route(
            "/conversations",
            post(conversations::create_conversation).get(conversations::list_conversations),
        )
        .route(
            "/conversations/:conversation_id",
            get(conversations::get_conversation)
                .patch(conversations::update_conversation)
                .delete(conversations::delete_conversation),
        )
        // Messages
        .route(
            "/conversations/:conversation_id/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        // Credentials
        .route("/credentials", get(credentials::list_credentials))
        .route(
            "/credentials/:provider",
            put(credentials::save_credential).delete(credentials::delete_credential),
        )
        // Users
        .route("/users", post(users::register_user))
        .route("/users/:user_id/login", post(users::record_login))
        // Admin
        .route("/admin/users", get(admin::list_users))
        .route(
            "/admin/users/:user_id",
            get(admin::get_user)
                .patch(admin::update_user)
                .delete(admin::delete_user),
        )
        .route("/admin/users/:user_id/stats", get(admin::get_user_stats))
        .route("/admin/dashboard", get(admin::dashboard));

    api_routes
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(state.config.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::PATCH,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            let origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            cors = cors.allow_origin(origins);
        }

        cors
    } else {
        CorsLayer::permissive()
    }
}
