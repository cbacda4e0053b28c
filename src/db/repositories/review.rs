use crate::domain::mean_grade;
use crate::entities::{prelude::*, products, reviews};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use tracing::{debug, info};

/// Fields of a review as submitted by a customer
#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: i32,
    pub product_id: i32,
    pub comment: Option<String>,
    pub grade: i32,
}

/// Repository for reviews and the product rating derived from them
pub struct ReviewRepository {
    conn: DatabaseConnection,
}

impl ReviewRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Active reviews on active products
    pub async fn list_active(&self) -> Result<Vec<reviews::Model>> {
        let rows = Reviews::find()
            .inner_join(Products)
            .filter(reviews::Column::IsActive.eq(true))
            .filter(products::Column::IsActive.eq(true))
            .order_by_asc(reviews::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn list_active_for_product(&self, product_id: i32) -> Result<Vec<reviews::Model>> {
        let rows = Reviews::find()
            .filter(reviews::Column::ProductId.eq(product_id))
            .filter(reviews::Column::IsActive.eq(true))
            .order_by_asc(reviews::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<reviews::Model>> {
        Ok(Reviews::find_by_id(id).one(&self.conn).await?)
    }

    /// Insert a review and refresh the product rating in one transaction.
    ///
    /// Returns the stored review and the product's new rating.
    pub async fn create_and_rate(&self, review: NewReview) -> Result<(reviews::Model, f64)> {
        let txn = self.conn.begin().await?;

        let model = reviews::ActiveModel {
            user_id: Set(review.user_id),
            product_id: Set(review.product_id),
            comment: Set(review.comment),
            comment_date: Set(chrono::Utc::now().to_rfc3339()),
            grade: Set(review.grade),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let rating = recompute_rating(&txn, review.product_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Product {} vanished", review.product_id))?;

        txn.commit().await?;
        info!(
            "Review {} on product {} stored, rating now {:.2}",
            model.id, model.product_id, rating
        );
        Ok((model, rating))
    }

    /// Soft delete a review and refresh the rating of its product.
    pub async fn deactivate_and_rate(&self, existing: reviews::Model) -> Result<f64> {
        let product_id = existing.product_id;
        let txn = self.conn.begin().await?;

        let mut active: reviews::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.update(&txn).await?;

        let rating = recompute_rating(&txn, product_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Product {product_id} vanished"))?;

        txn.commit().await?;
        Ok(rating)
    }
}

/// Recompute a product's rating from its active reviews and store it.
///
/// Reads through `conn`, so inside a transaction the caller's own uncommitted
/// review is part of the mean. Only the `rating` column is written. Returns
/// `None` when the product does not exist.
pub async fn recompute_rating<C>(conn: &C, product_id: i32) -> Result<Option<f64>>
where
    C: ConnectionTrait,
{
    if Products::find_by_id(product_id).one(conn).await?.is_none() {
        return Ok(None);
    }

    let grades: Vec<i32> = Reviews::find()
        .select_only()
        .column(reviews::Column::Grade)
        .filter(reviews::Column::ProductId.eq(product_id))
        .filter(reviews::Column::IsActive.eq(true))
        .into_tuple()
        .all(conn)
        .await?;

    let rating = mean_grade(&grades);
    debug!(
        product_id,
        reviews = grades.len(),
        rating,
        "Recomputed product rating"
    );

    Products::update_many()
        .col_expr(products::Column::Rating, Expr::value(rating))
        .filter(products::Column::Id.eq(product_id))
        .exec(conn)
        .await?;

    Ok(Some(rating))
}
