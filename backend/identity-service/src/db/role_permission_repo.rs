//! Role <-> permission association operations
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::role::{NamedRef, RolePermissionPair};

/// Flip membership of the (role, permission) association. Returns the new
/// state: true when the grant now exists, false when it was removed.
///
/// Single atomic check-and-flip: the conditional DELETE and the
/// ON CONFLICT INSERT each settle concurrent duplicates at the storage
/// layer, so two racing toggles cannot double-insert.
pub async fn toggle_role_permission(
    pool: &PgPool,
    role_id: Uuid,
    permission_id: Uuid,
) -> Result<bool> {
    let deleted = sqlx::query(
        "DELETE FROM role_permissions WHERE role_id = $1 AND permission_id = $2",
    )
    .bind(role_id)
    .bind(permission_id)
    .execute(pool)
    .await?;

    if deleted.rows_affected() > 0 {
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT INTO role_permissions (id, role_id, permission_id, created_at)
        VALUES (gen_random_uuid(), $1, $2, CURRENT_TIMESTAMP)
        ON CONFLICT (role_id, permission_id) DO NOTHING
        "#,
    )
    .bind(role_id)
    .bind(permission_id)
    .execute(pool)
    .await?;

    // A lost insert race still means the grant exists.
    Ok(true)
}

pub async fn list_role_permissions(pool: &PgPool) -> Result<Vec<RolePermissionPair>> {
    let pairs = sqlx::query_as::<_, RolePermissionPair>(
        r#"
        SELECT r.name AS role, p.name AS permission
        FROM role_permissions rp
        JOIN roles r ON r.id = rp.role_id
        JOIN permissions p ON p.id = rp.permission_id
        ORDER BY r.name, p.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(pairs)
}

pub async fn permissions_for_role(pool: &PgPool, role_id: Uuid) -> Result<Vec<NamedRef>> {
    let permissions = sqlx::query_as::<_, NamedRef>(
        r#"
        SELECT p.id, p.name, p.description
        FROM role_permissions rp
        JOIN permissions p ON p.id = rp.permission_id
        WHERE rp.role_id = $1
        ORDER BY p.name
        "#,
    )
    .bind(role_id)
    .fetch_all(pool)
    .await?;

    Ok(permissions)
}
