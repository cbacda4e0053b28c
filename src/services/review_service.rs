//! Domain service for product reviews and the ratings derived from them.

use crate::api::types::{CreatedReviewDto, ReviewDto};
use crate::auth::Claims;
use crate::services::access::AccessDenied;
use serde::Deserialize;
use thiserror::Error;

/// Errors specific to review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Review not found: {0}")]
    ReviewNotFound(i32),

    #[error("{0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ReviewError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ReviewError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<AccessDenied> for ReviewError {
    fn from(err: AccessDenied) -> Self {
        Self::Forbidden(err.0.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub product_id: i32,
    #[serde(default)]
    pub comment: Option<String>,
    pub grade: i32,
}

/// Domain service trait for reviews.
#[async_trait::async_trait]
pub trait ReviewService: Send + Sync {
    /// Active reviews on active products.
    async fn list_reviews(&self) -> Result<Vec<ReviewDto>, ReviewError>;

    /// Active reviews of the active product at `product_slug`.
    async fn product_reviews(&self, product_slug: &str) -> Result<Vec<ReviewDto>, ReviewError>;

    /// Stores a review and refreshes the product rating atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Validation`] for a grade outside 1..=5 and
    /// [`ReviewError::ProductNotFound`] if the product is missing or inactive.
    async fn create_review(
        &self,
        caller: &Claims,
        request: ReviewRequest,
    ) -> Result<CreatedReviewDto, ReviewError>;

    /// Soft-deletes a review and refreshes its product's rating.
    async fn delete_review(&self, caller: &Claims, review_id: i32) -> Result<f64, ReviewError>;

    /// Recomputes and stores the mean grade of a product's active reviews.
    async fn recompute_rating(&self, product_id: i32) -> Result<f64, ReviewError>;
}
