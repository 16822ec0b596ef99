//! Password reset flow: request a purpose-scoped token by email, then
//! exchange it for a new credential.
use std::sync::Arc;

use sqlx::PgPool;

use crate::db;
use crate::error::{ApiError, Result};
use crate::security::password;
use crate::security::token::{TokenCodec, TokenKind};
use crate::services::email::EmailService;
use crate::services::session_service::SessionService;

const RESET_REJECTED: &str = "Invalid or expired reset token";

#[derive(Clone)]
pub struct PasswordService {
    db: PgPool,
    tokens: TokenCodec,
    sessions: SessionService,
    mailer: Arc<EmailService>,
}

impl PasswordService {
    pub fn new(
        db: PgPool,
        tokens: TokenCodec,
        sessions: SessionService,
        mailer: Arc<EmailService>,
    ) -> Self {
        Self {
            db,
            tokens,
            sessions,
            mailer,
        }
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let normalized = email.trim().to_lowercase();

        let user = db::find_user_by_email(&self.db, &normalized)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("User with email {} not found", email))
            })?;

        let token = self.tokens.sign_password_reset(user.id, &user.email)?;
        self.mailer
            .send_password_reset_email(&user.email, &user.name, &token)
            .await?;

        tracing::info!(user_id = %user.id, "password reset email sent");
        Ok(())
    }

    /// Replace the credential hash and revoke every session for the user: a
    /// successful reset must invalidate all previously issued refresh tokens.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let claims = self.tokens.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "password reset token failed verification");
            ApiError::BadRequest(RESET_REJECTED.to_string())
        })?;

        if claims.kind != TokenKind::PasswordReset {
            tracing::warn!(sub = %claims.sub, "wrong token type presented to password reset");
            return Err(ApiError::BadRequest(RESET_REJECTED.to_string()));
        }

        let password_hash = password::hash_password(new_password)?;

        if !db::update_user_password(&self.db, claims.sub, &password_hash).await? {
            tracing::warn!(sub = %claims.sub, "password reset for missing user");
            return Err(ApiError::BadRequest(RESET_REJECTED.to_string()));
        }

        let revoked = self.sessions.revoke_all_for_user(claims.sub).await?;
        tracing::info!(user_id = %claims.sub, revoked, "password reset, sessions revoked");

        Ok(())
    }
}
