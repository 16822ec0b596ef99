//! Request authentication and authorization.
//!
//! One middleware does both steps: validate the access token (bearer header
//! or cookie), load the principal fresh from storage, then check the
//! permission set declared for the matched route in
//! [`crate::routes::OPERATION_PERMISSIONS`]. Handlers receive the principal
//! through request extensions.
use async_trait::async_trait;
use axum::{
    extract::{MatchedPath, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::ApiError;
use crate::middleware::cookies::ACCESS_COOKIE;
use crate::models::DeviceInfo;
use crate::routes;
use crate::security::token::TokenKind;
use crate::AppState;

/// Authenticated principal with effective roles and permissions, resolved
/// from storage on every protected call.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl CurrentUser {
    /// Conjunctive check: the principal must hold every listed permission.
    pub fn has_all(&self, required: &[&str]) -> bool {
        required
            .iter()
            .all(|needed| self.permissions.iter().any(|held| held == needed))
    }
}

/// Bearer header first, access-token cookie second.
fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(ACCESS_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

async fn load_principal(db: &PgPool, user_id: Uuid) -> crate::Result<Option<CurrentUser>> {
    let Some(user) = db::find_user_by_id(db, user_id).await? else {
        return Ok(None);
    };

    let roles = db::role_names_for_user(db, user.id).await?;
    let permissions = db::permission_names_for_user(db, user.id).await?;

    Ok(Some(CurrentUser {
        id: user.id,
        email: user.email,
        name: user.name,
        is_active: user.is_active,
        roles,
        permissions,
    }))
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_access_token(req.headers())
        .ok_or_else(|| ApiError::Unauthorized("Missing access token".to_string()))?;

    let claims = state.tokens.verify(&token).map_err(|e| {
        tracing::debug!(error = %e, "access token failed verification");
        ApiError::Unauthorized("Invalid or expired access token".to_string())
    })?;

    if claims.kind != TokenKind::Access {
        tracing::debug!(sub = %claims.sub, "non-access token presented for authentication");
        return Err(ApiError::Unauthorized(
            "Invalid or expired access token".to_string(),
        ));
    }

    let principal = load_principal(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired access token".to_string()))?;

    if let Some(matched) = req.extensions().get::<MatchedPath>() {
        let required = routes::required_permissions(req.method(), matched.as_str());
        if !principal.has_all(required) {
            tracing::debug!(
                user_id = %principal.id,
                route = matched.as_str(),
                ?required,
                "permission denied"
            );
            return Err(ApiError::Forbidden("Access denied".to_string()));
        }
    }

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Missing access token".to_string()))
    }
}

#[async_trait]
impl<S> axum::extract::FromRequestParts<S> for DeviceInfo
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(DeviceInfo::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn principal(permissions: &[&str]) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "bob@x.com".to_string(),
            name: "Bob".to_string(),
            is_active: true,
            roles: vec!["admin".to_string()],
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn permission_check_is_conjunctive() {
        let user = principal(&["user.read"]);
        assert!(user.has_all(&["user.read"]));
        assert!(!user.has_all(&["user.read", "user.list"]));

        let user = principal(&["user.read", "user.list"]);
        assert!(user.has_all(&["user.read", "user.list"]));
    }

    #[test]
    fn empty_requirement_always_passes() {
        let user = principal(&[]);
        assert!(user.has_all(&[]));
    }

    #[test]
    fn permission_match_is_exact() {
        let user = principal(&["user.read"]);
        assert!(!user.has_all(&["user"]));
        assert!(!user.has_all(&["user.read.extra"]));
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("access_token=cookie-token"),
        );
        assert_eq!(
            extract_access_token(&headers).as_deref(),
            Some("header-token")
        );
    }

    #[test]
    fn cookie_is_used_without_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("access_token=cookie-token"),
        );
        assert_eq!(
            extract_access_token(&headers).as_deref(),
            Some("cookie-token")
        );
    }

    #[test]
    fn missing_token_is_none() {
        assert!(extract_access_token(&HeaderMap::new()).is_none());
    }
}
