//! User <-> role association operations
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::role::{NamedRef, UserRolePair};

/// Flip membership of the (user, role) association; same atomic
/// check-and-flip as the role/permission toggle.
pub async fn toggle_user_role(pool: &PgPool, user_id: Uuid, role_id: Uuid) -> Result<bool> {
    let deleted = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
        .bind(user_id)
        .bind(role_id)
        .execute(pool)
        .await?;

    if deleted.rows_affected() > 0 {
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT INTO user_roles (id, user_id, role_id, created_at)
        VALUES (gen_random_uuid(), $1, $2, CURRENT_TIMESTAMP)
        ON CONFLICT (user_id, role_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(role_id)
    .execute(pool)
    .await?;

    Ok(true)
}

pub async fn list_user_roles(pool: &PgPool) -> Result<Vec<UserRolePair>> {
    let pairs = sqlx::query_as::<_, UserRolePair>(
        r#"
        SELECT u.name AS user_name, u.email AS user_email, r.name AS role
        FROM user_roles ur
        JOIN users u ON u.id = ur.user_id
        JOIN roles r ON r.id = ur.role_id
        ORDER BY u.email, r.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(pairs)
}

pub async fn roles_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<NamedRef>> {
    let roles = sqlx::query_as::<_, NamedRef>(
        r#"
        SELECT r.id, r.name, r.description
        FROM user_roles ur
        JOIN roles r ON r.id = ur.role_id
        WHERE ur.user_id = $1
        ORDER BY r.name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(roles)
}
