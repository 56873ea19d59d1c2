use parley_types::{filter_models, find_model, AIModel};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ApiError, ApiResult};
use crate::extract::{Json, Path, Query};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModelResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub avatar: String,
    pub capabilities: Vec<String>,
    /// Display name of the vendor
    pub provider: String,
    pub provider_id: String,
}

impl From<&AIModel> for ModelResponse {
    fn from(model: &AIModel) -> Self {
        Self {
            id: model.id.to_string(),
            name: model.name.to_string(),
            description: model.description.to_string(),
            avatar: model.avatar.to_string(),
            capabilities: model.capabilities.iter().map(|c| c.to_string()).collect(),
            provider: model.provider.to_string(),
            provider_id: model.provider_id.as_str().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListModelsQuery {
    pub q: Option<String>,
}

/// List the model catalog, optionally filtered
#[utoipa::path(
    get,
    path = "/models",
    params(
        ("q" = Option<String>, Query, description = "Case-insensitive match on name, description or capability")
    ),
    responses(
        (status = 200, description = "Matching models in catalog order", body = [ModelResponse])
    ),
    tag = "models"
)]
pub async fn list_models(Query(query): Query<ListModelsQuery>) -> Json<Vec<ModelResponse>> {
    let term = query.q.unwrap_or_default();
    Json(filter_models(&term).into_iter().map(ModelResponse::from).collect())
}

/// Get one model by id
#[utoipa::path(
    get,
    path = "/models/{model_id}",
    params(
        ("model_id" = String, Path, description = "Model ID")
    ),
    responses(
        (status = 200, description = "Model details", body = ModelResponse),
        (status = 404, description = "Unknown model")
    ),
    tag = "models"
)]
pub async fn get_model(Path(model_id): Path<String>) -> ApiResult<Json<ModelResponse>> {
    find_model(&model_id)
        .map(|model| Json(ModelResponse::from(model)))
        .ok_or_else(|| ApiError::NotFound(format!("Model not found: {}", model_id)))
}
