//! Email verification handlers
use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::auth::{ErrorResponse, MessageResponse};
use crate::models::user::{EmailRequest, VerifyEmailRequest};
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyEmailResponse {
    pub success: bool,
    pub message: String,
    pub user_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/verification/verify",
    tag = "Verification",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Account activated", body = VerifyEmailResponse),
        (status = 400, description = "Invalid or expired verification token", body = ErrorResponse)
    )
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<Json<VerifyEmailResponse>, ApiError> {
    payload.validate()?;

    let user_id = state.verification.verify_email(&payload.token).await?;

    Ok(Json(VerifyEmailResponse {
        success: true,
        message: "Email verified successfully".to_string(),
        user_id,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/verification/resend",
    tag = "Verification",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Verification email resent", body = MessageResponse),
        (status = 400, description = "Unknown email or already active", body = ErrorResponse)
    )
)]
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    payload.validate()?;

    state.verification.resend_verification(&payload.email).await?;

    Ok(Json(MessageResponse::new(
        "The email verification has been resent.",
    )))
}
