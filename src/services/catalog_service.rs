//! Domain service for the category tree and the products filed under it.

use crate::api::types::{CategoryDto, ProductDto};
use crate::auth::Claims;
use crate::services::access::AccessDenied;
use serde::Deserialize;
use thiserror::Error;

/// Errors specific to catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<AccessDenied> for CatalogError {
    fn from(err: AccessDenied) -> Self {
        Self::Forbidden(err.0.to_string())
    }
}

/// Body of category create and full-overwrite update.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i32>,
}

/// Body of product create and full-overwrite update. The slug is derived
/// from `name`; supplier and rating are never taken from the client.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i32,
    #[serde(default)]
    pub image_url: String,
    pub stock: i32,
    pub category_id: i32,
}

/// Domain service trait for the catalog.
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<CategoryDto>, CatalogError>;

    /// Creates a category with `slug = slugify(name)`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CategoryNotFound`] if `parent_id` names no category
    /// and [`CatalogError::Conflict`] if the slug is already in use.
    async fn create_category(
        &self,
        caller: &Claims,
        request: CategoryRequest,
    ) -> Result<CategoryDto, CatalogError>;

    /// Overwrites name, slug and parent of the category at `slug`.
    async fn update_category(
        &self,
        caller: &Claims,
        slug: &str,
        request: CategoryRequest,
    ) -> Result<CategoryDto, CatalogError>;

    /// Soft-deletes the active category at `slug`.
    async fn delete_category(&self, caller: &Claims, slug: &str) -> Result<(), CatalogError>;

    /// Visible products whose category is active.
    async fn list_products(&self) -> Result<Vec<ProductDto>, CatalogError>;

    /// Visible products in the category at `slug` and its direct children.
    async fn products_by_category(&self, slug: &str) -> Result<Vec<ProductDto>, CatalogError>;

    /// A single visible product.
    async fn product_detail(&self, slug: &str) -> Result<ProductDto, CatalogError>;

    async fn create_product(
        &self,
        caller: &Claims,
        request: ProductRequest,
    ) -> Result<ProductDto, CatalogError>;

    /// Full overwrite by an administrator or the owning supplier.
    async fn update_product(
        &self,
        caller: &Claims,
        slug: &str,
        request: ProductRequest,
    ) -> Result<ProductDto, CatalogError>;

    async fn delete_product(&self, caller: &Claims, slug: &str) -> Result<(), CatalogError>;
}
