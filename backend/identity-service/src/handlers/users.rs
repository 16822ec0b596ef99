//! User read handlers (sanitized projections only)
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::db;
use crate::error::ApiError;
use crate::models::user::ListQuery;
use crate::models::PublicUser;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub data: Vec<PublicUser>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    let users = db::list_users(&state.db, query.limit(), query.offset()).await?;
    let total = db::count_users(&state.db).await?;

    Ok(Json(UserListResponse {
        success: true,
        data: users.into_iter().map(PublicUser::from).collect(),
        page: query.page.max(1),
        per_page: query.limit() as u32,
        total,
    }))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = db::find_user_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(PublicUser::from(user)))
}
