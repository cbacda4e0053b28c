use crate::entities::{categories, prelude::*, products};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::info;

/// Editable product fields, shared by create and full-overwrite update
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: i32,
    pub image_url: String,
    pub stock: i32,
    pub category_id: i32,
}

/// Repository for product operations
pub struct ProductRepository {
    conn: DatabaseConnection,
}

impl ProductRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Active, in-stock products whose category is also active
    pub async fn list_visible(&self) -> Result<Vec<products::Model>> {
        let rows = Products::find()
            .inner_join(Categories)
            .filter(products::Column::IsActive.eq(true))
            .filter(products::Column::Stock.gt(0))
            .filter(categories::Column::IsActive.eq(true))
            .order_by_asc(products::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Active, in-stock products filed under any of `category_ids`
    pub async fn list_visible_in_categories(
        &self,
        category_ids: Vec<i32>,
    ) -> Result<Vec<products::Model>> {
        let rows = Products::find()
            .filter(products::Column::CategoryId.is_in(category_ids))
            .filter(products::Column::IsActive.eq(true))
            .filter(products::Column::Stock.gt(0))
            .order_by_asc(products::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<products::Model>> {
        Ok(Products::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn get_visible_by_slug(&self, slug: &str) -> Result<Option<products::Model>> {
        let row = Products::find()
            .filter(products::Column::Slug.eq(slug))
            .filter(products::Column::IsActive.eq(true))
            .filter(products::Column::Stock.gt(0))
            .one(&self.conn)
            .await?;

        Ok(row)
    }

    pub async fn get_active_by_slug(&self, slug: &str) -> Result<Option<products::Model>> {
        let row = Products::find()
            .filter(products::Column::Slug.eq(slug))
            .filter(products::Column::IsActive.eq(true))
            .one(&self.conn)
            .await?;

        Ok(row)
    }

    /// Whether another product already uses `slug`
    pub async fn slug_taken(&self, slug: &str, except_id: Option<i32>) -> Result<bool> {
        let mut query = Products::find()
            .select_only()
            .column(products::Column::Id)
            .filter(products::Column::Slug.eq(slug));
        if let Some(id) = except_id {
            query = query.filter(products::Column::Id.ne(id));
        }

        Ok(query.into_tuple::<i32>().one(&self.conn).await?.is_some())
    }

    pub async fn insert(
        &self,
        fields: ProductFields,
        supplier_id: Option<i32>,
    ) -> Result<products::Model> {
        let active = products::ActiveModel {
            name: Set(fields.name),
            slug: Set(fields.slug),
            description: Set(fields.description),
            price: Set(fields.price),
            image_url: Set(fields.image_url),
            stock: Set(fields.stock),
            supplier_id: Set(supplier_id),
            category_id: Set(fields.category_id),
            rating: Set(0.0),
            is_active: Set(true),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        info!("Created product {} ({})", model.slug, model.id);
        Ok(model)
    }

    /// Full overwrite of the editable fields. Supplier and rating are kept.
    pub async fn update(
        &self,
        existing: products::Model,
        fields: ProductFields,
    ) -> Result<products::Model> {
        let mut active: products::ActiveModel = existing.into();
        active.name = Set(fields.name);
        active.slug = Set(fields.slug);
        active.description = Set(fields.description);
        active.price = Set(fields.price);
        active.image_url = Set(fields.image_url);
        active.stock = Set(fields.stock);
        active.category_id = Set(fields.category_id);

        Ok(active.update(&self.conn).await?)
    }

    pub async fn deactivate(&self, existing: products::Model) -> Result<()> {
        let mut active: products::ActiveModel = existing.into();
        active.is_active = Set(false);
        let model = active.update(&self.conn).await?;
        info!("Deactivated product {} ({})", model.slug, model.id);
        Ok(())
    }
}
