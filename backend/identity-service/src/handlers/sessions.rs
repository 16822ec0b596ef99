//! Session management handlers
use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::handlers::auth::{ErrorResponse, MessageResponse};
use crate::middleware::cookies::clear_token_cookies;
use crate::middleware::CurrentUser;
use crate::models::SessionInfo;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct CleanupResponse {
    pub success: bool,
    pub message: String,
    pub deleted: u64,
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/sessions",
    tag = "Sessions",
    responses(
        (status = 200, description = "Active sessions, newest first", body = [SessionInfo]),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Missing session.list permission", body = ErrorResponse)
    )
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<SessionInfo>>, ApiError> {
    let sessions = state.sessions.list(user.id).await?;
    Ok(Json(sessions))
}

#[utoipa::path(
    delete,
    path = "/api/v1/auth/sessions/{session_id}",
    tag = "Sessions",
    params(("session_id" = String, Path, description = "Session id (refresh token jti)")),
    responses(
        (status = 200, description = "Session revoked", body = MessageResponse),
        (status = 400, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn revoke_session(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    // Scoped to the caller: someone else's jti behaves like an unknown one.
    let revoked = state.sessions.revoke_for_user(user.id, &session_id).await?;
    if !revoked {
        return Err(ApiError::BadRequest("Session not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Session revoked successfully")))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/sessions/logout-all",
    tag = "Sessions",
    responses(
        (status = 200, description = "Every session revoked, cookies cleared", body = MessageResponse)
    )
)]
pub async fn logout_all(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    state.sessions.revoke_all_for_user(user.id).await?;

    let jar = clear_token_cookies(jar);

    Ok((jar, Json(MessageResponse::new("Logged out from all devices"))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/sessions/cleanup",
    tag = "Sessions",
    responses(
        (status = 200, description = "Expired sessions deleted", body = CleanupResponse)
    )
)]
pub async fn cleanup_expired(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<CleanupResponse>, ApiError> {
    let deleted = state.sessions.sweep_expired().await?;

    Ok(Json(CleanupResponse {
        success: true,
        message: format!("Cleaned up {} expired refresh tokens", deleted),
        deleted,
    }))
}
