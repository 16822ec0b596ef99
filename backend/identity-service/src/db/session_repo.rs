//! Refresh-session persistence. The row keyed by `jti` is the authority for
//! refresh-token validity; nothing here is cached in memory.
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{RefreshSession, SessionInfo};

pub async fn insert_session(
    pool: &PgPool,
    jti: &str,
    user_id: Uuid,
    device_info: &str,
    ip_address: &str,
    expires_at: DateTime<Utc>,
) -> Result<RefreshSession> {
    let session = sqlx::query_as::<_, RefreshSession>(
        r#"
        INSERT INTO refresh_sessions (id, user_id, device_info, ip_address, created_at, expires_at)
        VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP, $5)
        RETURNING *
        "#,
    )
    .bind(jti)
    .bind(user_id)
    .bind(device_info)
    .bind(ip_address)
    .bind(expires_at)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

pub async fn find_session(pool: &PgPool, jti: &str) -> Result<Option<RefreshSession>> {
    let session =
        sqlx::query_as::<_, RefreshSession>("SELECT * FROM refresh_sessions WHERE id = $1")
            .bind(jti)
            .fetch_optional(pool)
            .await?;

    Ok(session)
}

/// Invalidate the old session and create its replacement in one transaction.
/// If the process dies between the two statements the user re-logs-in; there
/// is never a moment with two live rows for one rotation.
pub async fn rotate_session(
    pool: &PgPool,
    old_jti: &str,
    new_jti: &str,
    user_id: Uuid,
    device_info: &str,
    ip_address: &str,
    expires_at: DateTime<Utc>,
) -> Result<RefreshSession> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM refresh_sessions WHERE id = $1")
        .bind(old_jti)
        .execute(&mut *tx)
        .await?;

    let session = sqlx::query_as::<_, RefreshSession>(
        r#"
        INSERT INTO refresh_sessions (id, user_id, device_info, ip_address, created_at, expires_at)
        VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP, $5)
        RETURNING *
        "#,
    )
    .bind(new_jti)
    .bind(user_id)
    .bind(device_info)
    .bind(ip_address)
    .bind(expires_at)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(session)
}

/// Idempotent: deleting an absent session reports false, not an error.
pub async fn delete_session(pool: &PgPool, jti: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM refresh_sessions WHERE id = $1")
        .bind(jti)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete one session only if it belongs to `user_id`.
pub async fn delete_session_for_user(pool: &PgPool, user_id: Uuid, jti: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM refresh_sessions WHERE id = $1 AND user_id = $2")
        .bind(jti)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_sessions_for_user(pool: &PgPool, user_id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM refresh_sessions WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_expired_sessions(pool: &PgPool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM refresh_sessions WHERE expires_at < CURRENT_TIMESTAMP")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn list_active_sessions(pool: &PgPool, user_id: Uuid) -> Result<Vec<SessionInfo>> {
    let sessions = sqlx::query_as::<_, SessionInfo>(
        r#"
        SELECT id, device_info, ip_address, created_at, expires_at
        FROM refresh_sessions
        WHERE user_id = $1 AND expires_at > CURRENT_TIMESTAMP
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}
