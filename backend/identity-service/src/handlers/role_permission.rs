//! Role <-> permission association handlers
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db;
use crate::error::ApiError;
use crate::models::role::{
    RolePermissionPair, RoleWithPermissions, ToggleRolePermissionRequest,
};
use crate::AppState;

/// `assigned` reflects the state AFTER the flip.
#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleResponse {
    pub assigned: bool,
}

pub async fn toggle_role_permission(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRolePermissionRequest>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let assigned =
        db::toggle_role_permission(&state.db, payload.role_id, payload.permission_id).await?;

    Ok(Json(ToggleResponse { assigned }))
}

pub async fn list_role_permissions(
    State(state): State<AppState>,
) -> Result<Json<Vec<RolePermissionPair>>, ApiError> {
    let pairs = db::list_role_permissions(&state.db).await?;
    Ok(Json(pairs))
}

pub async fn role_permissions(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
) -> Result<Json<RoleWithPermissions>, ApiError> {
    let role = db::find_role_by_id(&state.db, role_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Role with ID {} not found", role_id)))?;

    let permissions = db::permissions_for_role(&state.db, role_id).await?;

    Ok(Json(RoleWithPermissions {
        id: role.id,
        name: role.name,
        description: role.description,
        permissions,
    }))
}
