//! Role administration handlers. Role names are case-insensitive and stored
//! lowercase.
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::db;
use crate::error::ApiError;
use crate::handlers::auth::MessageResponse;
use crate::models::role::RoleRequest;
use crate::models::Role;
use crate::AppState;

pub async fn create_role(
    State(state): State<AppState>,
    Json(payload): Json<RoleRequest>,
) -> Result<(StatusCode, Json<Role>), ApiError> {
    payload.validate()?;

    let name = payload.name.trim().to_lowercase();
    let role = db::create_role(&state.db, &name, payload.description.as_deref()).await?;

    Ok((StatusCode::CREATED, Json(role)))
}

pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<Role>>, ApiError> {
    let roles = db::list_roles(&state.db).await?;
    Ok(Json(roles))
}

pub async fn get_role(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
) -> Result<Json<Role>, ApiError> {
    let role = db::find_role_by_id(&state.db, role_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Role not found".to_string()))?;

    Ok(Json(role))
}

pub async fn update_role(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
    Json(payload): Json<RoleRequest>,
) -> Result<Json<Role>, ApiError> {
    payload.validate()?;

    let name = payload.name.trim().to_lowercase();
    let role = db::update_role(&state.db, role_id, &name, payload.description.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Role not found".to_string()))?;

    Ok(Json(role))
}

pub async fn delete_role(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !db::delete_role(&state.db, role_id).await? {
        return Err(ApiError::NotFound("Role not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Role deleted successfully")))
}
