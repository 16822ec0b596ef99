//! Refresh-session lifecycle: creation, rotation, revocation, bulk
//! invalidation, and the expiry sweep. Every check round-trips to storage;
//! the session table is the authority for refresh-token validity.
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::Result;
use crate::metrics;
use crate::models::{DeviceInfo, RefreshSession, SessionInfo};
use crate::security::token::{generate_jti, TokenCodec, REFRESH_TOKEN_TTL_DAYS};

/// A freshly issued refresh session together with its signed token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub jti: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionService {
    db: PgPool,
    tokens: TokenCodec,
}

impl SessionService {
    pub fn new(db: PgPool, tokens: TokenCodec) -> Self {
        Self { db, tokens }
    }

    /// Create a new session: random 128-bit jti, signed refresh token, and
    /// the backing row with a 7-day expiry.
    pub async fn issue(&self, user_id: Uuid, device: &DeviceInfo) -> Result<IssuedSession> {
        let jti = generate_jti();
        let expires_at = Utc::now() + Duration::days(REFRESH_TOKEN_TTL_DAYS);
        let refresh_token = self.tokens.sign_refresh(user_id, &jti)?;

        db::insert_session(
            &self.db,
            &jti,
            user_id,
            &device.user_agent,
            &device.ip_address,
            expires_at,
        )
        .await?;

        tracing::debug!(%user_id, jti = %jti, "issued refresh session");

        Ok(IssuedSession {
            jti,
            refresh_token,
            expires_at,
        })
    }

    /// Mandatory rotation on every refresh: the old row is deleted and the
    /// replacement inserted in one transaction, giving refresh tokens
    /// single-use semantics. A reused token finds no row and fails.
    pub async fn rotate(
        &self,
        old_jti: &str,
        user_id: Uuid,
        device: &DeviceInfo,
    ) -> Result<IssuedSession> {
        let jti = generate_jti();
        let expires_at = Utc::now() + Duration::days(REFRESH_TOKEN_TTL_DAYS);
        let refresh_token = self.tokens.sign_refresh(user_id, &jti)?;

        db::rotate_session(
            &self.db,
            old_jti,
            &jti,
            user_id,
            &device.user_agent,
            &device.ip_address,
            expires_at,
        )
        .await?;

        tracing::debug!(%user_id, old_jti = %old_jti, new_jti = %jti, "rotated refresh session");

        Ok(IssuedSession {
            jti,
            refresh_token,
            expires_at,
        })
    }

    pub async fn find(&self, jti: &str) -> Result<Option<RefreshSession>> {
        db::find_session(&self.db, jti).await
    }

    /// Idempotent; revoking an unknown jti reports false.
    pub async fn revoke(&self, jti: &str) -> Result<bool> {
        let revoked = db::delete_session(&self.db, jti).await?;
        if revoked {
            metrics::inc_sessions_revoked(1);
        }
        Ok(revoked)
    }

    /// Revoke one session only if it belongs to `user_id`.
    pub async fn revoke_for_user(&self, user_id: Uuid, jti: &str) -> Result<bool> {
        let revoked = db::delete_session_for_user(&self.db, user_id, jti).await?;
        if revoked {
            metrics::inc_sessions_revoked(1);
        }
        Ok(revoked)
    }

    /// Logout-all and password reset both funnel through here.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64> {
        let count = db::delete_sessions_for_user(&self.db, user_id).await?;
        if count > 0 {
            metrics::inc_sessions_revoked(count);
            tracing::info!(%user_id, count, "revoked all refresh sessions");
        }
        Ok(count)
    }

    /// Delete every expired row. Meant for periodic invocation; expiry is
    /// never swept implicitly on read.
    pub async fn sweep_expired(&self) -> Result<u64> {
        let count = db::delete_expired_sessions(&self.db).await?;
        if count > 0 {
            metrics::inc_sessions_revoked(count);
        }
        Ok(count)
    }

    /// Non-expired sessions, newest first.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<SessionInfo>> {
        db::list_active_sessions(&self.db, user_id).await
    }
}
