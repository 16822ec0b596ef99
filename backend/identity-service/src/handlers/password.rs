//! Password reset handlers
use axum::{extract::State, Json};
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::auth::{ErrorResponse, MessageResponse};
use crate::models::user::{EmailRequest, ResetPasswordRequest};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/auth/password/forgot",
    tag = "Password",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Reset token emailed", body = MessageResponse),
        (status = 404, description = "No user with that email", body = ErrorResponse)
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    payload.validate()?;

    state.passwords.request_password_reset(&payload.email).await?;

    Ok(Json(MessageResponse::new(
        "Password reset instructions have been sent to your email",
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/password/reset",
    tag = "Password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Credential replaced, all sessions revoked", body = MessageResponse),
        (status = 400, description = "Invalid or expired reset token", body = ErrorResponse)
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    payload.validate()?;

    state
        .passwords
        .reset_password(&payload.token, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new(
        "Password successfully reset. Please login again.",
    )))
}
