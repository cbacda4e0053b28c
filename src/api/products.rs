use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_id, validate_name};
use super::{ApiError, ApiResponse, AppState, MessageResponse, ProductDto};
use crate::services::ProductRequest;

fn validate_request(payload: ProductRequest) -> Result<ProductRequest, ApiError> {
    validate_id("category", payload.category_id)?;

    Ok(ProductRequest {
        name: validate_name("Product name", &payload.name)?,
        description: payload.description.trim().to_string(),
        image_url: payload.image_url.trim().to_string(),
        ..payload
    })
}

/// GET /products/
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ProductDto>>>, ApiError> {
    let products = state.catalog_service().list_products().await?;
    Ok(Json(ApiResponse::success(products)))
}

/// GET /products/{category_slug}
pub async fn products_by_category(
    State(state): State<Arc<AppState>>,
    Path(category_slug): Path<String>,
) -> Result<Json<ApiResponse<Vec<ProductDto>>>, ApiError> {
    let products = state
        .catalog_service()
        .products_by_category(&category_slug)
        .await?;

    Ok(Json(ApiResponse::success(products)))
}

/// GET /products/detail/{product_slug}
pub async fn product_detail(
    State(state): State<Arc<AppState>>,
    Path(product_slug): Path<String>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    let product = state
        .catalog_service()
        .product_detail(&product_slug)
        .await?;

    Ok(Json(ApiResponse::success(product)))
}

/// POST /products/
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Json(payload): Json<ProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request = validate_request(payload)?;
    let product = state
        .catalog_service()
        .create_product(&claims, request)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

/// PUT /products/{slug}
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Path(slug): Path<String>,
    Json(payload): Json<ProductRequest>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    let request = validate_request(payload)?;
    let product = state
        .catalog_service()
        .update_product(&claims, &slug, request)
        .await?;

    Ok(Json(ApiResponse::success(product)))
}

/// DELETE /products/{slug}
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .catalog_service()
        .delete_product(&claims, &slug)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "Product '{slug}' deleted"
    )))))
}
