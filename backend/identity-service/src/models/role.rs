use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Permission {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RoleRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PermissionRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRolePermissionRequest {
    pub role_id: Uuid,
    pub permission_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ToggleUserRoleRequest {
    pub user_id: Uuid,
    pub role_id: Uuid,
}

/// Lightweight (id, name, description) projection used by association reads.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RoleWithPermissions {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<NamedRef>,
}

#[derive(Debug, Serialize)]
pub struct UserWithRoles {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub roles: Vec<NamedRef>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RolePermissionPair {
    pub role: String,
    pub permission: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserRolePair {
    pub user_name: String,
    pub user_email: String,
    pub role: String,
}
