//! Permission administration handlers. Permission names are case-insensitive
//! and stored lowercase.
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
use crate::models::role::PermissionRequest;
use crate::models::Permission;
use crate::AppState;

pub async fn create_permission(
    State(state): State<AppState>,
    Json(payload): Json<PermissionRequest>,
) -> Result<(StatusCode, Json<Permission>), ApiError> {
    payload.validate()?;

    let name = payload.name.trim().to_lowercase();
    let permission = db::create_permission(&state.db, &name, payload.description.as_deref()).await?;

    Ok((StatusCode::CREATED, Json(permission)))
}

pub async fn list_permissions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Permission>>, ApiError> {
    let permissions = db::list_permissions(&state.db).await?;
    Ok(Json(permissions))
}

pub async fn get_permission(
    State(state): State<AppState>,
    Path(permission_id): Path<Uuid>,
) -> Result<Json<Permission>, ApiError> {
    let permission = db::find_permission_by_id(&state.db, permission_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Permission not found".to_string()))?;

    Ok(Json(permission))
}

pub async fn update_permission(
    State(state): State<AppState>,
    Path(permission_id): Path<Uuid>,
    Json(payload): Json<PermissionRequest>,
) -> Result<Json<Permission>, ApiError> {
    payload.validate()?;

    let name = payload.name.trim().to_lowercase();
    let permission =
        db::update_permission(&state.db, permission_id, &name, payload.description.as_deref())
            .await?
            .ok_or_else(|| ApiError::NotFound("Permission not found".to_string()))?;

    Ok(Json(permission))
}

pub async fn delete_permission(
    State(state): State<AppState>,
    Path(permission_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !db::delete_permission(&state.db, permission_id).await? {
        return Err(ApiError::NotFound("Permission not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Permission deleted successfully")))
}
