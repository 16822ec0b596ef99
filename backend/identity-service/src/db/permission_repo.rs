//! Permission database operations
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Permission;

pub async fn create_permission(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
) -> Result<Permission> {
    let permission = sqlx::query_as::<_, Permission>(
        r#"
        INSERT INTO permissions (id, name, description, created_at, updated_at)
        VALUES (gen_random_uuid(), $1, $2, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(permission)
}

pub async fn find_permission_by_id(pool: &PgPool, permission_id: Uuid) -> Result<Option<Permission>> {
    let permission = sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE id = $1")
        .bind(permission_id)
        .fetch_optional(pool)
        .await?;

    Ok(permission)
}

pub async fn list_permissions(pool: &PgPool) -> Result<Vec<Permission>> {
    let permissions = sqlx::query_as::<_, Permission>("SELECT * FROM permissions ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(permissions)
}

pub async fn update_permission(
    pool: &PgPool,
    permission_id: Uuid,
    name: &str,
    description: Option<&str>,
) -> Result<Option<Permission>> {
    let permission = sqlx::query_as::<_, Permission>(
        r#"
        UPDATE permissions
        SET name = $1, description = $2, updated_at = CURRENT_TIMESTAMP
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(permission_id)
    .fetch_optional(pool)
    .await?;

    Ok(permission)
}

pub async fn delete_permission(pool: &PgPool, permission_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
        .bind(permission_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
