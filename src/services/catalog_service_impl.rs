//! `SeaORM` implementation of the `CatalogService` trait.

use crate::api::types::{CategoryDto, ProductDto};
use crate::auth::Claims;
use crate::db::{ProductFields, Store};
use crate::domain::slugify;
use crate::services::access::{require_admin, require_product_manager, require_product_owner};
use crate::services::catalog_service::{
    CatalogError, CatalogService, CategoryRequest, ProductRequest,
};
use async_trait::async_trait;
use tracing::{debug, info};

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn slug_for(name: &str) -> Result<String, CatalogError> {
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(CatalogError::Validation(format!(
                "Name '{name}' does not contain any letters or digits"
            )));
        }
        Ok(slug)
    }

    /// The parent must exist and must not be the category itself.
    async fn check_parent(
        &self,
        parent_id: Option<i32>,
        self_id: Option<i32>,
    ) -> Result<(), CatalogError> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };

        if self_id == Some(parent_id) {
            return Err(CatalogError::Validation(
                "A category cannot be its own parent".to_string(),
            ));
        }

        if self.store.get_category(parent_id).await?.is_none() {
            return Err(CatalogError::CategoryNotFound(parent_id.to_string()));
        }
        Ok(())
    }

    async fn product_fields(
        &self,
        request: ProductRequest,
        except_id: Option<i32>,
    ) -> Result<ProductFields, CatalogError> {
        if request.price < 0 {
            return Err(CatalogError::Validation(
                "Price cannot be negative".to_string(),
            ));
        }
        if request.stock < 0 {
            return Err(CatalogError::Validation(
                "Stock cannot be negative".to_string(),
            ));
        }

        if self.store.get_category(request.category_id).await?.is_none() {
            return Err(CatalogError::CategoryNotFound(
                request.category_id.to_string(),
            ));
        }

        let slug = Self::slug_for(&request.name)?;
        if self.store.is_product_slug_taken(&slug, except_id).await? {
            return Err(CatalogError::Conflict(format!(
                "A product with slug '{slug}' already exists"
            )));
        }

        Ok(ProductFields {
            name: request.name,
            slug,
            description: request.description,
            price: request.price,
            image_url: request.image_url,
            stock: request.stock,
            category_id: request.category_id,
        })
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list_categories(&self) -> Result<Vec<CategoryDto>, CatalogError> {
        let categories = self.store.list_active_categories().await?;
        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }

    async fn create_category(
        &self,
        caller: &Claims,
        request: CategoryRequest,
    ) -> Result<CategoryDto, CatalogError> {
        require_admin(caller)?;

        let slug = Self::slug_for(&request.name)?;
        self.check_parent(request.parent_id, None).await?;

        if self.store.is_category_slug_taken(&slug, None).await? {
            return Err(CatalogError::Conflict(format!(
                "A category with slug '{slug}' already exists"
            )));
        }

        let category = self
            .store
            .create_category(request.name, slug, request.parent_id)
            .await?;

        Ok(CategoryDto::from(category))
    }

    async fn update_category(
        &self,
        caller: &Claims,
        slug: &str,
        request: CategoryRequest,
    ) -> Result<CategoryDto, CatalogError> {
        require_admin(caller)?;

        let existing = self
            .store
            .get_category_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::CategoryNotFound(slug.to_string()))?;

        let new_slug = Self::slug_for(&request.name)?;
        self.check_parent(request.parent_id, Some(existing.id))
            .await?;

        if self
            .store
            .is_category_slug_taken(&new_slug, Some(existing.id))
            .await?
        {
            return Err(CatalogError::Conflict(format!(
                "A category with slug '{new_slug}' already exists"
            )));
        }

        let category = self
            .store
            .update_category(existing, request.name, new_slug, request.parent_id)
            .await?;

        Ok(CategoryDto::from(category))
    }

    async fn delete_category(&self, caller: &Claims, slug: &str) -> Result<(), CatalogError> {
        require_admin(caller)?;

        let existing = self
            .store
            .get_active_category_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::CategoryNotFound(slug.to_string()))?;

        self.store.deactivate_category(existing).await?;
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<ProductDto>, CatalogError> {
        let products = self.store.list_visible_products().await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    async fn products_by_category(&self, slug: &str) -> Result<Vec<ProductDto>, CatalogError> {
        let category = self
            .store
            .get_active_category_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::CategoryNotFound(slug.to_string()))?;

        let mut category_ids = vec![category.id];
        category_ids.extend(self.store.get_subcategory_ids(category.id).await?);
        debug!(slug, ?category_ids, "Resolved category scope");

        let products = self.store.list_visible_products_in(category_ids).await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    async fn product_detail(&self, slug: &str) -> Result<ProductDto, CatalogError> {
        let product = self
            .store
            .get_visible_product_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::ProductNotFound(slug.to_string()))?;

        Ok(ProductDto::from(product))
    }

    async fn create_product(
        &self,
        caller: &Claims,
        request: ProductRequest,
    ) -> Result<ProductDto, CatalogError> {
        require_product_manager(caller)?;

        let fields = self.product_fields(request, None).await?;
        let product = self.store.create_product(fields, Some(caller.id)).await?;

        info!(product_id = product.id, supplier_id = caller.id, "Product listed");
        Ok(ProductDto::from(product))
    }

    async fn update_product(
        &self,
        caller: &Claims,
        slug: &str,
        request: ProductRequest,
    ) -> Result<ProductDto, CatalogError> {
        require_product_manager(caller)?;

        let existing = self
            .store
            .get_active_product_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::ProductNotFound(slug.to_string()))?;
        require_product_owner(caller, &existing)?;

        let fields = self.product_fields(request, Some(existing.id)).await?;
        let product = self.store.update_product(existing, fields).await?;

        Ok(ProductDto::from(product))
    }

    async fn delete_product(&self, caller: &Claims, slug: &str) -> Result<(), CatalogError> {
        require_product_manager(caller)?;

        let existing = self
            .store
            .get_active_product_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::ProductNotFound(slug.to_string()))?;
        require_product_owner(caller, &existing)?;

        self.store.deactivate_product(existing).await?;
        Ok(())
    }
}
