use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, validation};
use crate::db::User;

const NO_TOKEN: &str = "Unauthorized - No token provided";
const BAD_TOKEN: &str = "Unauthorized - Invalid token";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthData {
    pub message: String,
    pub token: String,
    pub user: UserDto,
}

/// The authenticated caller, attached to the request by the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub avatar: Option<String>,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            avatar: user.avatar,
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolve the `Authorization: Bearer <token>` header to a user.
///
/// The two rejection messages are part of the wire contract: one for a
/// missing header, one for anything else (bad scheme, bad signature, expiry,
/// or a token whose user no longer exists).
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, ApiError> {
    let token =
        bearer_token(headers).ok_or_else(|| ApiError::Unauthorized(NO_TOKEN.to_string()))?;

    let user_id = state.tokens.verify(token).map_err(|err| {
        tracing::debug!("Rejected bearer token: {err}");
        ApiError::Unauthorized(BAD_TOKEN.to_string())
    })?;

    let user = state
        .store
        .get_user_by_id(user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load user: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized(BAD_TOKEN.to_string()))?;

    tracing::Span::current().record("user_id", user.id);

    Ok(user.into())
}

/// Router-level gate for the watchlist and metrics routes.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, request.headers()).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
/// Create an account and hand back a fresh session token
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthData>>), ApiError> {
    let username = payload.username.trim();
    let email = payload.email.trim();
    validation::validate_registration(username, email, &payload.password)?;

    let user = state
        .store
        .create_user(username, email, &payload.password)
        .await
        .map_err(|e| ApiError::internal(format!("Registration failed: {e}")))?
        .ok_or_else(|| ApiError::validation("User already exists"))?;

    let token = state
        .tokens
        .mint(user.id)
        .map_err(|e| ApiError::internal(format!("Failed to sign token: {e}")))?;

    tracing::info!("Registered user: {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AuthData {
            message: "User registered successfully".to_string(),
            token,
            user: user.into(),
        })),
    ))
}

/// POST /auth/login
/// Check credentials and hand back a fresh session token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthData>>, ApiError> {
    let email = payload.email.trim();
    if email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state
        .store
        .get_user_by_email(email)
        .await
        .map_err(|e| ApiError::internal(format!("Authentication error: {e}")))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let is_valid = state
        .store
        .verify_user_password(email, &payload.password)
        .await
        .map_err(|e| ApiError::internal(format!("Authentication error: {e}")))?;

    if !is_valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state
        .tokens
        .mint(user.id)
        .map_err(|e| ApiError::internal(format!("Failed to sign token: {e}")))?;

    Ok(Json(ApiResponse::success(AuthData {
        message: "Login successful".to_string(),
        token,
        user: user.into(),
    })))
}
