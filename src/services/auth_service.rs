//! Domain service for accounts and access tokens.
//!
//! Handles registration, credential checks, token issuance and the
//! administrator-only user management operations.

use crate::api::types::{TokenResponse, UserDto};
use crate::auth::{Claims, TokenError};
use crate::db::User;
use crate::services::access::AccessDenied;
use serde::Deserialize;
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Could not validate credentials")]
    InvalidCredentials,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token is invalid")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(String),

    #[error("User not found: {0}")]
    NotFound(i32),

    #[error("{0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<AccessDenied> for AuthError {
    fn from(err: AccessDenied) -> Self {
        Self::Forbidden(err.0.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::TokenExpired,
            TokenError::Invalid => Self::InvalidToken,
            TokenError::Signing(msg) => Self::Internal(msg),
            lifetime @ TokenError::Lifetime(_) => Self::Internal(lifetime.to_string()),
        }
    }
}

/// Registration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Credentials posted to the token endpoint, as a form or as JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// New supplier/customer flags for a user. The admin flag is not editable.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PermissionsRequest {
    pub is_supplier: bool,
    pub is_customer: bool,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an active customer account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Conflict`] if the username or email is registered.
    async fn register(&self, request: RegisterRequest) -> Result<UserDto, AuthError>;

    /// Checks a username/password pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for unknown users, wrong
    /// passwords and deactivated accounts alike.
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Authenticates and signs a bearer token carrying the user's roles.
    async fn issue_token(&self, username: &str, password: &str)
    -> Result<TokenResponse, AuthError>;

    /// Validates a bearer token and returns its claims.
    fn verify_token(&self, token: &str) -> Result<Claims, AuthError>;

    /// Profile of the account a token was issued to.
    async fn current_user(&self, claims: &Claims) -> Result<UserDto, AuthError>;

    async fn set_permissions(
        &self,
        caller: &Claims,
        user_id: i32,
        request: PermissionsRequest,
    ) -> Result<UserDto, AuthError>;

    /// Soft-deletes an account. Administrators cannot deactivate themselves.
    async fn deactivate_user(&self, caller: &Claims, user_id: i32) -> Result<(), AuthError>;
}
