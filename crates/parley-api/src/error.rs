use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parley_llm::ProviderError;
use parley_persist::PersistError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Upstream provider failed; its message is passed through
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::Provider(ref e) => {
                tracing::error!(provider = ?e.provider(), "Provider error: {}", e);
                (StatusCode::BAD_GATEWAY, e.upstream_message())
            }
            ApiError::Persist(ref e) if e.is_not_found() => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            ApiError::Persist(PersistError::UserExists(_)) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
