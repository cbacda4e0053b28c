//! `SeaORM` implementation of the `ReviewService` trait.

use crate::api::types::{CreatedReviewDto, ReviewDto};
use crate::auth::Claims;
use crate::db::{NewReview, Store};
use crate::domain::{MAX_GRADE, MIN_GRADE};
use crate::services::access::{require_admin, require_customer};
use crate::services::review_service::{ReviewError, ReviewRequest, ReviewService};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmReviewService {
    store: Store,
}

impl SeaOrmReviewService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn validate_grade(grade: i32) -> Result<i32, ReviewError> {
        if !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
            return Err(ReviewError::Validation(format!(
                "Grade must be between {MIN_GRADE} and {MAX_GRADE}, got {grade}"
            )));
        }
        Ok(grade)
    }
}

#[async_trait]
impl ReviewService for SeaOrmReviewService {
    async fn list_reviews(&self) -> Result<Vec<ReviewDto>, ReviewError> {
        let reviews = self.store.list_active_reviews().await?;
        Ok(reviews.into_iter().map(ReviewDto::from).collect())
    }

    async fn product_reviews(&self, product_slug: &str) -> Result<Vec<ReviewDto>, ReviewError> {
        let product = self
            .store
            .get_active_product_by_slug(product_slug)
            .await?
            .ok_or_else(|| ReviewError::ProductNotFound(product_slug.to_string()))?;

        let reviews = self.store.list_product_reviews(product.id).await?;
        Ok(reviews.into_iter().map(ReviewDto::from).collect())
    }

    async fn create_review(
        &self,
        caller: &Claims,
        request: ReviewRequest,
    ) -> Result<CreatedReviewDto, ReviewError> {
        require_customer(caller)?;
        let grade = Self::validate_grade(request.grade)?;

        let product = self
            .store
            .get_product(request.product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| ReviewError::ProductNotFound(request.product_id.to_string()))?;

        let comment = request
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let (review, rating) = self
            .store
            .create_review(NewReview {
                user_id: caller.id,
                product_id: product.id,
                comment,
                grade,
            })
            .await?;

        metrics::counter!("reviews_created_total").increment(1);

        Ok(CreatedReviewDto {
            review: ReviewDto::from(review),
            product_rating: rating,
        })
    }

    async fn delete_review(&self, caller: &Claims, review_id: i32) -> Result<f64, ReviewError> {
        require_admin(caller)?;

        let review = self
            .store
            .get_review(review_id)
            .await?
            .filter(|r| r.is_active)
            .ok_or(ReviewError::ReviewNotFound(review_id))?;

        let product_id = review.product_id;
        let rating = self.store.deactivate_review(review).await?;

        info!(review_id, product_id, rating, by = %caller.sub, "Review removed");
        Ok(rating)
    }

    async fn recompute_rating(&self, product_id: i32) -> Result<f64, ReviewError> {
        self.store
            .recompute_rating(product_id)
            .await?
            .ok_or_else(|| ReviewError::ProductNotFound(product_id.to_string()))
    }
}
