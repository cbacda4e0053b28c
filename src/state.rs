use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CatalogService, ReviewService, SeaOrmAuthService, SeaOrmCatalogService,
    SeaOrmReviewService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub catalog_service: Arc<dyn CatalogService>,

    pub review_service: Arc<dyn ReviewService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Self::with_store(config, store)
    }

    /// Wire the services around an already migrated store.
    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let tokens = TokenIssuer::new(
            &config.security.jwt_secret,
            config.security.token_ttl_minutes,
        )?;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            tokens,
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let catalog_service =
            Arc::new(SeaOrmCatalogService::new(store.clone())) as Arc<dyn CatalogService>;

        let review_service =
            Arc::new(SeaOrmReviewService::new(store.clone())) as Arc<dyn ReviewService>;

        Ok(Self {
            config: Arc::new(config),
            store,
            auth_service,
            catalog_service,
            review_service,
        })
    }
}
