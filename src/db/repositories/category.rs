use crate::entities::{categories, prelude::*};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::info;

/// Repository for category operations
pub struct CategoryRepository {
    conn: DatabaseConnection,
}

impl CategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_active(&self) -> Result<Vec<categories::Model>> {
        let rows = Categories::find()
            .filter(categories::Column::IsActive.eq(true))
            .order_by_asc(categories::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<categories::Model>> {
        Ok(Categories::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<categories::Model>> {
        let row = Categories::find()
            .filter(categories::Column::Slug.eq(slug))
            .one(&self.conn)
            .await?;

        Ok(row)
    }

    pub async fn get_active_by_slug(&self, slug: &str) -> Result<Option<categories::Model>> {
        let row = Categories::find()
            .filter(categories::Column::Slug.eq(slug))
            .filter(categories::Column::IsActive.eq(true))
            .one(&self.conn)
            .await?;

        Ok(row)
    }

    /// Ids of the categories directly below `parent_id`. Grandchildren are not included.
    pub async fn child_ids(&self, parent_id: i32) -> Result<Vec<i32>> {
        let ids = Categories::find()
            .select_only()
            .column(categories::Column::Id)
            .filter(categories::Column::ParentId.eq(parent_id))
            .into_tuple::<i32>()
            .all(&self.conn)
            .await?;

        Ok(ids)
    }

    /// Whether another category already uses `slug`
    pub async fn slug_taken(&self, slug: &str, except_id: Option<i32>) -> Result<bool> {
        let mut query = Categories::find().filter(categories::Column::Slug.eq(slug));
        if let Some(id) = except_id {
            query = query.filter(categories::Column::Id.ne(id));
        }

        Ok(query.one(&self.conn).await?.is_some())
    }

    pub async fn insert(
        &self,
        name: String,
        slug: String,
        parent_id: Option<i32>,
    ) -> Result<categories::Model> {
        let active = categories::ActiveModel {
            name: Set(name),
            slug: Set(slug),
            parent_id: Set(parent_id),
            is_active: Set(true),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        info!("Created category {} ({})", model.slug, model.id);
        Ok(model)
    }

    /// Full overwrite of the editable fields
    pub async fn update(
        &self,
        existing: categories::Model,
        name: String,
        slug: String,
        parent_id: Option<i32>,
    ) -> Result<categories::Model> {
        let mut active: categories::ActiveModel = existing.into();
        active.name = Set(name);
        active.slug = Set(slug);
        active.parent_id = Set(parent_id);

        Ok(active.update(&self.conn).await?)
    }

    pub async fn deactivate(&self, existing: categories::Model) -> Result<()> {
        let mut active: categories::ActiveModel = existing.into();
        active.is_active = Set(false);
        let model = active.update(&self.conn).await?;
        info!("Deactivated category {} ({})", model.slug, model.id);
        Ok(())
    }
}
