//! Role database operations
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Role;

pub async fn create_role(pool: &PgPool, name: &str, description: Option<&str>) -> Result<Role> {
    let role = sqlx::query_as::<_, Role>(
        r#"
        INSERT INTO roles (id, name, description, created_at, updated_at)
        VALUES (gen_random_uuid(), $1, $2, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(role)
}

pub async fn find_role_by_id(pool: &PgPool, role_id: Uuid) -> Result<Option<Role>> {
    let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
        .bind(role_id)
        .fetch_optional(pool)
        .await?;

    Ok(role)
}

pub async fn list_roles(pool: &PgPool) -> Result<Vec<Role>> {
    let roles = sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(roles)
}

pub async fn update_role(
    pool: &PgPool,
    role_id: Uuid,
    name: &str,
    description: Option<&str>,
) -> Result<Option<Role>> {
    let role = sqlx::query_as::<_, Role>(
        r#"
        UPDATE roles
        SET name = $1, description = $2, updated_at = CURRENT_TIMESTAMP
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(role_id)
    .fetch_optional(pool)
    .await?;

    Ok(role)
}

/// Association rows cascade at the storage layer.
pub async fn delete_role(pool: &PgPool, role_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(role_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
