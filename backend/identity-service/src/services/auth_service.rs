//! Credential lifecycle orchestration: register, login, refresh, logout.
use std::sync::Arc;

use sqlx::PgPool;

use crate::db;
use crate::error::{ApiError, Result};
use crate::metrics;
use crate::models::{DeviceInfo, PublicUser};
use crate::security::password;
use crate::security::token::{TokenCodec, TokenKind};
use crate::services::email::EmailService;
use crate::services::session_service::SessionService;

/// All refresh failures collapse to this message at the boundary; the real
/// reason (expired, reused, wrong owner, inactive) only goes to the logs.
const REFRESH_REJECTED: &str = "Invalid or expired refresh token";

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: PublicUser,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub struct RefreshedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    tokens: TokenCodec,
    sessions: SessionService,
    mailer: Arc<EmailService>,
}

impl AuthService {
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

    /// Create an inactive user and send the verification email. A failed
    /// send surfaces as an error even though the user row already exists;
    /// the account can still be completed via resend-verification.
    pub async fn register(&self, email: &str, name: &str, raw_password: &str) -> Result<()> {
        metrics::inc_register_requests();
        let email = email.trim().to_lowercase();

        if db::find_user_by_email(&self.db, &email).await?.is_some() {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = password::hash_password(raw_password)?;
        let user = db::create_user(&self.db, &email, name, &password_hash).await?;

        let token = self.tokens.sign_verification(user.id, &user.email)?;
        self.mailer
            .send_verification_email(&user.email, &user.name, &token)
            .await?;

        tracing::info!(user_id = %user.id, "user registered, verification email sent");
        Ok(())
    }

    pub async fn login(
        &self,
        email: &str,
        raw_password: &str,
        device: &DeviceInfo,
    ) -> Result<LoginOutcome> {
        metrics::inc_login_requests();
        let email = email.trim().to_lowercase();

        let user = match db::find_user_by_email(&self.db, &email).await? {
            Some(user) => user,
            None => {
                metrics::inc_login_failures();
                return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
            }
        };

        if !user.is_active {
            metrics::inc_login_failures();
            return Err(ApiError::Unauthorized(
                "Please verify your email first".to_string(),
            ));
        }

        if !password::verify_password(raw_password, &user.password_hash)? {
            metrics::inc_login_failures();
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        let roles = db::role_names_for_user(&self.db, user.id).await?;
        let permissions = db::permission_names_for_user(&self.db, user.id).await?;

        let session = self.sessions.issue(user.id, device).await?;
        let access_token = self.tokens.sign_access(user.id, &roles, &permissions)?;

        tracing::info!(user_id = %user.id, "user logged in");

        Ok(LoginOutcome {
            user: user.into(),
            roles,
            permissions,
            access_token,
            refresh_token: session.refresh_token,
        })
    }

    /// Rotate the refresh session and sign a new access token with roles and
    /// permissions re-read from storage, so a grant change takes effect
    /// within one refresh cycle instead of waiting for token expiry.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        device: &DeviceInfo,
    ) -> Result<RefreshedTokens> {
        let claims = self.tokens.verify(refresh_token).map_err(|e| {
            tracing::debug!(error = %e, "refresh token failed verification");
            ApiError::Unauthorized(REFRESH_REJECTED.to_string())
        })?;

        if claims.kind != TokenKind::Refresh {
            tracing::warn!(sub = %claims.sub, "non-refresh token presented to refresh");
            return Err(ApiError::Unauthorized(REFRESH_REJECTED.to_string()));
        }

        let jti = claims.jti.as_deref().ok_or_else(|| {
            tracing::warn!(sub = %claims.sub, "refresh token missing jti");
            ApiError::Unauthorized(REFRESH_REJECTED.to_string())
        })?;

        let session = match self.sessions.find(jti).await? {
            Some(session) => session,
            None => {
                // Either never issued or already rotated: reuse of a rotated
                // token lands here and is rejected.
                tracing::warn!(sub = %claims.sub, jti = %jti, "refresh session not found (reuse or revoked)");
                return Err(ApiError::Unauthorized(REFRESH_REJECTED.to_string()));
            }
        };

        if session.user_id != claims.sub {
            tracing::warn!(sub = %claims.sub, jti = %jti, "refresh session owner mismatch");
            return Err(ApiError::Unauthorized(REFRESH_REJECTED.to_string()));
        }

        if session.is_expired() {
            let _ = self.sessions.revoke(jti).await;
            tracing::debug!(sub = %claims.sub, jti = %jti, "refresh session expired");
            return Err(ApiError::Unauthorized(REFRESH_REJECTED.to_string()));
        }

        let user = match db::find_user_by_id(&self.db, session.user_id).await? {
            Some(user) if user.is_active => user,
            Some(user) => {
                tracing::warn!(user_id = %user.id, "refresh rejected for inactive account");
                return Err(ApiError::Unauthorized(REFRESH_REJECTED.to_string()));
            }
            None => {
                tracing::warn!(user_id = %session.user_id, "refresh session for missing user");
                return Err(ApiError::Unauthorized(REFRESH_REJECTED.to_string()));
            }
        };

        let roles = db::role_names_for_user(&self.db, user.id).await?;
        let permissions = db::permission_names_for_user(&self.db, user.id).await?;

        let session = self.sessions.rotate(jti, user.id, device).await?;
        let access_token = self.tokens.sign_access(user.id, &roles, &permissions)?;

        metrics::inc_token_refresh();

        Ok(RefreshedTokens {
            access_token,
            refresh_token: session.refresh_token,
        })
    }

    /// Best-effort revocation of the presented refresh token. Malformed or
    /// already-invalid tokens are swallowed: logout always succeeds.
    pub async fn logout(&self, refresh_token: Option<&str>) {
        let Some(refresh_token) = refresh_token else {
            return;
        };

        match self.tokens.verify(refresh_token) {
            Ok(claims) if claims.kind == TokenKind::Refresh => {
                if let Some(jti) = claims.jti.as_deref() {
                    if let Err(e) = self.sessions.revoke(jti).await {
                        tracing::warn!(error = %e, "failed to revoke refresh session on logout");
                    }
                }
            }
            Ok(_) => {
                tracing::warn!("non-refresh token presented to logout, nothing to revoke");
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to verify refresh token on logout");
            }
        }
    }
}
