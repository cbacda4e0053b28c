use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::{AuthService, CatalogService, ReviewService};
use crate::state::SharedState;

pub mod auth;
mod categories;
mod error;
mod observability;
mod products;
mod reviews;
mod system;
pub mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<Config> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn catalog_service(&self) -> &Arc<dyn CatalogService> {
        &self.shared.catalog_service
    }

    #[must_use]
    pub fn review_service(&self) -> &Arc<dyn ReviewService> {
        &self.shared.review_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/", get(system::welcome))
        .route("/health", get(system::health))
        .route("/metrics", get(observability::get_metrics))
        .merge(catalog_routes())
        .merge(auth_routes())
        .merge(review_routes())
        .with_state(state)
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
}

fn catalog_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/categories/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{slug}",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route(
            "/products/",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/detail/{product_slug}",
            get(products::product_detail),
        )
        .route(
            "/products/{slug}",
            get(products::products_by_category)
                .put(products::update_product)
                .delete(products::delete_product),
        )
}

fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/", get(auth::basic_user).post(auth::register))
        .route("/auth/token", post(auth::issue_token))
        .route("/auth/me", get(auth::me))
        .route("/auth/users/{id}/permissions", put(auth::set_permissions))
        .route("/auth/users/{id}", delete(auth::deactivate_user))
}

fn review_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/reviews/",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/reviews/{key}",
            get(reviews::product_reviews).delete(reviews::delete_review),
        )
}
