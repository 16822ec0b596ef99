//! Effective role/permission resolution for a principal: the two-hop join
//! from user through roles to permissions, flattened and deduplicated.
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;

pub async fn role_names_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<String>> {
    let roles = sqlx::query_scalar::<_, String>(
        r#"
        SELECT r.name
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

pub async fn permission_names_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<String>> {
    let permissions = sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT p.name
        FROM user_roles ur
        JOIN role_permissions rp ON rp.role_id = ur.role_id
        JOIN permissions p ON p.id = rp.permission_id
        WHERE ur.user_id = $1
        ORDER BY p.name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(permissions)
}
