use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{categories, products, reviews};

pub mod migrator;
pub mod repositories;

pub use repositories::product::ProductFields;
pub use repositories::review::NewReview;
pub use repositories::user::{NewUser, User};

/// Data-access context handed to every service. Cloning shares the pool.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn category_repo(&self) -> repositories::category::CategoryRepository {
        repositories::category::CategoryRepository::new(self.conn.clone())
    }

    fn product_repo(&self) -> repositories::product::ProductRepository {
        repositories::product::ProductRepository::new(self.conn.clone())
    }

    fn review_repo(&self) -> repositories::review::ReviewRepository {
        repositories::review::ReviewRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn is_user_taken(&self, username: &str, email: &str) -> Result<bool> {
        self.user_repo().is_taken(username, email).await
    }

    pub async fn create_user(&self, new_user: NewUser, config: &SecurityConfig) -> Result<User> {
        self.user_repo().create(new_user, config).await
    }

    pub async fn verify_user_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn set_user_roles(
        &self,
        id: i32,
        is_supplier: bool,
        is_customer: bool,
    ) -> Result<Option<User>> {
        self.user_repo().set_roles(id, is_supplier, is_customer).await
    }

    pub async fn deactivate_user(&self, id: i32) -> Result<bool> {
        self.user_repo().deactivate(id).await
    }

    // ========================================================================
    // Categories
    // ========================================================================

    pub async fn list_active_categories(&self) -> Result<Vec<categories::Model>> {
        self.category_repo().list_active().await
    }

    pub async fn get_category(&self, id: i32) -> Result<Option<categories::Model>> {
        self.category_repo().get(id).await
    }

    pub async fn get_category_by_slug(&self, slug: &str) -> Result<Option<categories::Model>> {
        self.category_repo().get_by_slug(slug).await
    }

    pub async fn get_active_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<categories::Model>> {
        self.category_repo().get_active_by_slug(slug).await
    }

    pub async fn get_subcategory_ids(&self, parent_id: i32) -> Result<Vec<i32>> {
        self.category_repo().child_ids(parent_id).await
    }

    pub async fn is_category_slug_taken(&self, slug: &str, except_id: Option<i32>) -> Result<bool> {
        self.category_repo().slug_taken(slug, except_id).await
    }

    pub async fn create_category(
        &self,
        name: String,
        slug: String,
        parent_id: Option<i32>,
    ) -> Result<categories::Model> {
        self.category_repo().insert(name, slug, parent_id).await
    }

    pub async fn update_category(
        &self,
        existing: categories::Model,
        name: String,
        slug: String,
        parent_id: Option<i32>,
    ) -> Result<categories::Model> {
        self.category_repo()
            .update(existing, name, slug, parent_id)
            .await
    }

    pub async fn deactivate_category(&self, existing: categories::Model) -> Result<()> {
        self.category_repo().deactivate(existing).await
    }

    // ========================================================================
    // Products
    // ========================================================================

    pub async fn list_visible_products(&self) -> Result<Vec<products::Model>> {
        self.product_repo().list_visible().await
    }

    pub async fn list_visible_products_in(
        &self,
        category_ids: Vec<i32>,
    ) -> Result<Vec<products::Model>> {
        self.product_repo()
            .list_visible_in_categories(category_ids)
            .await
    }

    pub async fn get_product(&self, id: i32) -> Result<Option<products::Model>> {
        self.product_repo().get(id).await
    }

    pub async fn get_visible_product_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<products::Model>> {
        self.product_repo().get_visible_by_slug(slug).await
    }

    pub async fn get_active_product_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<products::Model>> {
        self.product_repo().get_active_by_slug(slug).await
    }

    pub async fn is_product_slug_taken(&self, slug: &str, except_id: Option<i32>) -> Result<bool> {
        self.product_repo().slug_taken(slug, except_id).await
    }

    pub async fn create_product(
        &self,
        fields: ProductFields,
        supplier_id: Option<i32>,
    ) -> Result<products::Model> {
        self.product_repo().insert(fields, supplier_id).await
    }

    pub async fn update_product(
        &self,
        existing: products::Model,
        fields: ProductFields,
    ) -> Result<products::Model> {
        self.product_repo().update(existing, fields).await
    }

    pub async fn deactivate_product(&self, existing: products::Model) -> Result<()> {
        self.product_repo().deactivate(existing).await
    }

    // ========================================================================
    // Reviews
    // ========================================================================

    pub async fn list_active_reviews(&self) -> Result<Vec<reviews::Model>> {
        self.review_repo().list_active().await
    }

    pub async fn list_product_reviews(&self, product_id: i32) -> Result<Vec<reviews::Model>> {
        self.review_repo().list_active_for_product(product_id).await
    }

    pub async fn get_review(&self, id: i32) -> Result<Option<reviews::Model>> {
        self.review_repo().get(id).await
    }

    pub async fn create_review(&self, review: NewReview) -> Result<(reviews::Model, f64)> {
        self.review_repo().create_and_rate(review).await
    }

    pub async fn deactivate_review(&self, existing: reviews::Model) -> Result<f64> {
        self.review_repo().deactivate_and_rate(existing).await
    }

    /// Recompute a product's rating outside of any review mutation
    pub async fn recompute_rating(&self, product_id: i32) -> Result<Option<f64>> {
        repositories::review::recompute_rating(&self.conn, product_id).await
    }
}
