//! Authentication handlers
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::cookies::{clear_token_cookies, set_token_cookies, REFRESH_COOKIE};
use crate::middleware::CurrentUser;
use crate::models::user::{LoginRequest, RegisterRequest};
use crate::models::{DeviceInfo, PublicUser};
use crate::AppState;

/// Generic success envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginData {
    pub user: PublicUser,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub data: LoginData,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshTokenResponse {
    pub success: bool,
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Error envelope (documentation only; produced by `ApiError`).
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: String,
    pub error: String,
}

/// Refresh token from the cookie first, then the Authorization header.
fn extract_refresh_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(REFRESH_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered, verification email sent", body = MessageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    payload.validate()?;

    state
        .auth
        .register(&payload.email, &payload.name, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Register success, please check your email to verify account",
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; token cookies set", body = LoginResponse),
        (status = 401, description = "Invalid credentials or unverified email", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    device: DeviceInfo,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    payload.validate()?;

    let outcome = state
        .auth
        .login(&payload.email, &payload.password, &device)
        .await?;

    let jar = set_token_cookies(
        jar,
        outcome.access_token.clone(),
        outcome.refresh_token.clone(),
        state.config.is_production(),
    );

    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            data: LoginData {
                user: outcome.user,
                roles: outcome.roles,
                permissions: outcome.permissions,
                access_token: outcome.access_token,
                refresh_token: outcome.refresh_token,
            },
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "Auth",
    responses(
        (status = 200, description = "Session rotated; fresh cookies set", body = RefreshTokenResponse),
        (status = 401, description = "Missing, invalid, expired or reused refresh token", body = ErrorResponse)
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    device: DeviceInfo,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<RefreshTokenResponse>), ApiError> {
    let refresh_token = extract_refresh_token(&jar, &headers)
        .ok_or_else(|| ApiError::Unauthorized("Refresh token not provided".to_string()))?;

    let tokens = state.auth.refresh(&refresh_token, &device).await?;

    let jar = set_token_cookies(
        jar,
        tokens.access_token.clone(),
        tokens.refresh_token.clone(),
        state.config.is_production(),
    );

    Ok((
        jar,
        Json(RefreshTokenResponse {
            success: true,
            message: "Token refreshed successfully".to_string(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session revoked, cookies cleared", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    _user: CurrentUser,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    let refresh_token = extract_refresh_token(&jar, &headers);
    state.auth.logout(refresh_token.as_deref()).await;

    let jar = clear_token_cookies(jar);

    Ok((jar, Json(MessageResponse::new("Logged out successfully"))))
}
