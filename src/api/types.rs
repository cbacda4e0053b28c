use serde::{Deserialize, Serialize};

use crate::db::User;
use crate::entities::{categories, products, reviews};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i32>,
    pub is_active: bool,
}

impl From<categories::Model> for CategoryDto {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            parent_id: model.parent_id,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: i32,
    pub image_url: String,
    pub stock: i32,
    pub supplier_id: Option<i32>,
    pub category_id: i32,
    pub rating: f64,
    pub is_active: bool,
}

impl From<products::Model> for ProductDto {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            price: model.price,
            image_url: model.image_url,
            stock: model.stock,
            supplier_id: model.supplier_id,
            category_id: model.category_id,
            rating: model.rating,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewDto {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub comment: Option<String>,
    pub comment_date: String,
    pub grade: i32,
    pub is_active: bool,
}

impl From<reviews::Model> for ReviewDto {
    fn from(model: reviews::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            product_id: model.product_id,
            comment: model.comment,
            comment_date: model.comment_date,
            grade: model.grade,
            is_active: model.is_active,
        }
    }
}

/// A freshly stored review together with the product rating it produced.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedReviewDto {
    pub review: ReviewDto,
    pub product_rating: f64,
}

/// Public view of an account; the password hash never leaves the repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub is_supplier: bool,
    pub is_customer: bool,
    pub created_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
            email: user.email,
            is_active: user.is_active,
            is_admin: user.roles.is_admin,
            is_supplier: user.roles.is_supplier,
            is_customer: user.roles.is_customer,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    #[must_use]
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub version: String,
    pub uptime: u64,
    pub database: String,
}
