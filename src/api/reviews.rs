use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, ReviewDto};
use crate::services::ReviewRequest;

const MAX_COMMENT_LEN: usize = 2000;

#[derive(Debug, Serialize)]
pub struct ReviewRemoved {
    pub id: i32,
    pub product_rating: f64,
}

/// GET /reviews/
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, ApiError> {
    let reviews = state.review_service().list_reviews().await?;
    Ok(Json(ApiResponse::success(reviews)))
}

/// GET /reviews/{product_slug}
pub async fn product_reviews(
    State(state): State<Arc<AppState>>,
    Path(product_slug): Path<String>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, ApiError> {
    let reviews = state
        .review_service()
        .product_reviews(&product_slug)
        .await?;

    Ok(Json(ApiResponse::success(reviews)))
}

/// POST /reviews/
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Json(payload): Json<ReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_id("product", payload.product_id)?;
    if payload
        .comment
        .as_ref()
        .is_some_and(|c| c.chars().count() > MAX_COMMENT_LEN)
    {
        return Err(ApiError::validation(format!(
            "Comment must be {MAX_COMMENT_LEN} characters or less"
        )));
    }

    let created = state
        .review_service()
        .create_review(&claims, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// DELETE /reviews/{id}
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReviewRemoved>>, ApiError> {
    let id = validate_id("review", id)?;
    let product_rating = state.review_service().delete_review(&claims, id).await?;

    Ok(Json(ApiResponse::success(ReviewRemoved {
        id,
        product_rating,
    })))
}
