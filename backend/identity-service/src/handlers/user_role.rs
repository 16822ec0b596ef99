//! User <-> role association handlers
use axum::{
    extract::{Path, State},
    Json,
};

use uuid::Uuid;

use crate::db;
use crate::error::ApiError;
use crate::handlers::role_permission::ToggleResponse;
use crate::models::role::{ToggleUserRoleRequest, UserRolePair, UserWithRoles};
use crate::AppState;

pub async fn toggle_user_role(
    State(state): State<AppState>,
    Json(payload): Json<ToggleUserRoleRequest>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let assigned = db::toggle_user_role(&state.db, payload.user_id, payload.role_id).await?;

    Ok(Json(ToggleResponse { assigned }))
}

pub async fn list_user_roles(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserRolePair>>, ApiError> {
    let pairs = db::list_user_roles(&state.db).await?;
    Ok(Json(pairs))
}

pub async fn user_roles(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserWithRoles>, ApiError> {
    let user = db::find_user_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let roles = db::roles_for_user(&state.db, user_id).await?;

    Ok(Json(UserWithRoles {
        id: user.id,
        name: user.name,
        email: user.email,
        roles,
    }))
}
