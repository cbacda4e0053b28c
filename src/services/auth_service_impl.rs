//! `SeaORM` implementation of the `AuthService` trait.

use crate::api::types::{TokenResponse, UserDto};
use crate::auth::{Claims, TokenIssuer};
use crate::config::SecurityConfig;
use crate::db::{NewUser, Store, User};
use crate::services::access::require_admin;
use crate::services::auth_service::{
    AuthError, AuthService, PermissionsRequest, RegisterRequest,
};
use async_trait::async_trait;
use tracing::{info, warn};

pub struct SeaOrmAuthService {
    store: Store,
    tokens: TokenIssuer,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: TokenIssuer, security: SecurityConfig) -> Self {
        Self {
            store,
            tokens,
            security,
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, request: RegisterRequest) -> Result<UserDto, AuthError> {
        if self
            .store
            .is_user_taken(&request.username, &request.email)
            .await?
        {
            return Err(AuthError::Conflict(
                "Username or email is already registered".to_string(),
            ));
        }

        let user = self
            .store
            .create_user(
                NewUser {
                    first_name: request.first_name,
                    last_name: request.last_name,
                    username: request.username,
                    email: request.email,
                    password: request.password,
                },
                &self.security,
            )
            .await?;

        info!(user_id = user.id, username = %user.username, "Registered user");
        Ok(UserDto::from(user))
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .store
            .verify_user_password(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            warn!(username, "Login attempt on deactivated account");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn issue_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, AuthError> {
        let user = self.authenticate(username, password).await?;
        let token = self.tokens.issue(&user)?;
        Ok(TokenResponse::bearer(token))
    }

    fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        Ok(self.tokens.verify(token)?)
    }

    async fn current_user(&self, claims: &Claims) -> Result<UserDto, AuthError> {
        let user = self
            .store
            .get_user(claims.id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(UserDto::from(user))
    }

    async fn set_permissions(
        &self,
        caller: &Claims,
        user_id: i32,
        request: PermissionsRequest,
    ) -> Result<UserDto, AuthError> {
        require_admin(caller)?;

        let user = self
            .store
            .set_user_roles(user_id, request.is_supplier, request.is_customer)
            .await?
            .ok_or(AuthError::NotFound(user_id))?;

        info!(
            user_id,
            is_supplier = request.is_supplier,
            is_customer = request.is_customer,
            by = %caller.sub,
            "Updated user permissions"
        );
        Ok(UserDto::from(user))
    }

    async fn deactivate_user(&self, caller: &Claims, user_id: i32) -> Result<(), AuthError> {
        require_admin(caller)?;

        if caller.id == user_id {
            return Err(AuthError::Validation(
                "Administrators cannot deactivate their own account".to_string(),
            ));
        }

        if !self.store.deactivate_user(user_id).await? {
            return Err(AuthError::NotFound(user_id));
        }

        info!(user_id, by = %caller.sub, "Deactivated user");
        Ok(())
    }
}
