use axum::{
    Form, Json,
    extract::{FromRequest, FromRequestParts, Path, Request, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::IntoResponse,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::sync::Arc;

use super::validation::{
    validate_email, validate_id, validate_name, validate_password, validate_username,
};
use super::{ApiError, ApiResponse, AppState, MessageResponse, TokenResponse, UserDto};
use crate::auth::Claims;
use crate::services::{PermissionsRequest, RegisterRequest, TokenRequest};

// ============================================================================
// Extractors
// ============================================================================

/// Claims of a validated bearer token.
///
/// Rejects with 401 when the `Authorization` header is missing, malformed,
/// badly signed or expired. Role checks are left to the services.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        let claims = state.auth_service().verify_token(token)?;
        tracing::Span::current().record("user_id", claims.id);

        Ok(Self(claims))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Username and password from an `Authorization: Basic` header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some((username.to_string(), password.to_string()))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_username(&payload.username)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let request = RegisterRequest {
        first_name: validate_name("First name", &payload.first_name)?,
        last_name: validate_name("Last name", &payload.last_name)?,
        ..payload
    };

    let user = state.auth_service().register(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// GET /auth/ with HTTP basic credentials.
pub async fn basic_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let (username, password) = basic_credentials(&headers)
        .ok_or_else(|| ApiError::unauthorized("Basic credentials required"))?;

    let user = state
        .auth_service()
        .authenticate(&username, &password)
        .await?;
    tracing::Span::current().record("user_id", user.id);

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// POST /auth/token
///
/// Accepts `application/x-www-form-urlencoded` (the OAuth2 password flow)
/// or a JSON body. The response is the bare token object, not the envelope.
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<TokenResponse>, ApiError> {
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    let credentials = if is_json {
        Json::<TokenRequest>::from_request(request, &())
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?
            .0
    } else {
        Form::<TokenRequest>::from_request(request, &())
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?
            .0
    };

    let token = state
        .auth_service()
        .issue_token(&credentials.username, &credentials.password)
        .await?;

    Ok(Json(token))
}

/// GET /auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.auth_service().current_user(&claims).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// PUT /auth/users/{id}/permissions
pub async fn set_permissions(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<PermissionsRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let id = validate_id("user", id)?;
    let user = state
        .auth_service()
        .set_permissions(&claims, id, payload)
        .await?;

    Ok(Json(ApiResponse::success(user)))
}

/// DELETE /auth/users/{id}
pub async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_id("user", id)?;
    state.auth_service().deactivate_user(&claims, id).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "User {id} deactivated"
    )))))
}
