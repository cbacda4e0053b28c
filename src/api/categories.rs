use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_id, validate_name};
use super::{ApiError, ApiResponse, AppState, CategoryDto, MessageResponse};
use crate::services::CategoryRequest;

fn validate_request(payload: CategoryRequest) -> Result<CategoryRequest, ApiError> {
    let parent_id = payload
        .parent_id
        .map(|id| validate_id("parent category", id))
        .transpose()?;

    Ok(CategoryRequest {
        name: validate_name("Category name", &payload.name)?,
        parent_id,
    })
}

/// GET /categories/
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CategoryDto>>>, ApiError> {
    let categories = state.catalog_service().list_categories().await?;
    Ok(Json(ApiResponse::success(categories)))
}

/// POST /categories/
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Json(payload): Json<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request = validate_request(payload)?;
    let category = state
        .catalog_service()
        .create_category(&claims, request)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(category))))
}

/// PUT /categories/{slug}
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Path(slug): Path<String>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<ApiResponse<CategoryDto>>, ApiError> {
    let request = validate_request(payload)?;
    let category = state
        .catalog_service()
        .update_category(&claims, &slug, request)
        .await?;

    Ok(Json(ApiResponse::success(category)))
}

/// DELETE /categories/{slug}
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .catalog_service()
        .delete_category(&claims, &slug)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "Category '{slug}' deleted"
    )))))
}
