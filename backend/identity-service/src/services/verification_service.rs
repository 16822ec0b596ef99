//! Email verification: redeem a verification token to activate the account,
//! or re-issue one for a still-inactive user.
use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::{ApiError, Result};
use crate::security::token::{TokenCodec, TokenKind};
use crate::services::email::EmailService;

const VERIFICATION_REJECTED: &str = "Invalid or expired verification token";

#[derive(Clone)]
pub struct VerificationService {
    db: PgPool,
    tokens: TokenCodec,
    mailer: Arc<EmailService>,
}

impl VerificationService {
    pub fn new(db: PgPool, tokens: TokenCodec, mailer: Arc<EmailService>) -> Self {
        Self { db, tokens, mailer }
    }

    /// Activate the account named by the token's subject. Redeeming a token
    /// twice re-applies the flag, which is harmless; the second call still
    /// reports success.
    pub async fn verify_email(&self, token: &str) -> Result<Uuid> {
        let claims = self.tokens.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "verification token failed verification");
            ApiError::BadRequest(VERIFICATION_REJECTED.to_string())
        })?;

        if claims.kind != TokenKind::Verification {
            tracing::warn!(sub = %claims.sub, "wrong token type presented to email verification");
            return Err(ApiError::BadRequest(VERIFICATION_REJECTED.to_string()));
        }

        if !db::set_user_active(&self.db, claims.sub).await? {
            tracing::warn!(sub = %claims.sub, "verification token for missing user");
            return Err(ApiError::BadRequest(VERIFICATION_REJECTED.to_string()));
        }

        tracing::info!(user_id = %claims.sub, "email verified");
        Ok(claims.sub)
    }

    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        let normalized = email.trim().to_lowercase();

        let user = db::find_user_by_email(&self.db, &normalized)
            .await?
            .ok_or_else(|| {
                ApiError::BadRequest(format!("User with email {} not found", email))
            })?;

        if user.is_active {
            return Err(ApiError::BadRequest(
                "The user is already active; no verification is required.".to_string(),
            ));
        }

        let token = self.tokens.sign_verification(user.id, &user.email)?;
        self.mailer
            .send_verification_email(&user.email, &user.name, &token)
            .await?;

        tracing::info!(user_id = %user.id, "verification email resent");
        Ok(())
    }
}
