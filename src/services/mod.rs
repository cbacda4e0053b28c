pub mod access;

pub mod auth_service;
pub use auth_service::{AuthError, AuthService, PermissionsRequest, RegisterRequest, TokenRequest};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod catalog_service;
pub use catalog_service::{CatalogError, CatalogService, CategoryRequest, ProductRequest};

pub mod catalog_service_impl;
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod review_service;
pub use review_service::{ReviewError, ReviewRequest, ReviewService};

pub mod review_service_impl;
pub use review_service_impl::SeaOrmReviewService;
