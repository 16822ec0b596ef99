//! Route definitions and the operation -> required-permission table.
use axum::{
    http::Method,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::metrics;
use crate::middleware::require_auth;
use crate::openapi::ApiDoc;
use crate::permissions as perms;
use crate::AppState;

/// Declarative authorization table: matched route pattern -> the full set of
/// permissions the caller must hold (conjunctive). Consulted by the single
/// authorization middleware; protected routes absent from this table only
/// require authentication.
pub const OPERATION_PERMISSIONS: &[(&str, &str, &[&str])] = &[
    // Sessions
    ("GET", "/api/v1/auth/sessions", &[perms::SESSION_LIST]),
    (
        "DELETE",
        "/api/v1/auth/sessions/:session_id",
        &[perms::SESSION_REVOKE],
    ),
    (
        "POST",
        "/api/v1/auth/sessions/logout-all",
        &[perms::SESSION_LOGOUT_ALL],
    ),
    (
        "POST",
        "/api/v1/auth/sessions/cleanup",
        &[perms::SESSION_DELETE_EXPIRED],
    ),
    // Users
    ("GET", "/api/v1/users", &[perms::USER_LIST]),
    ("GET", "/api/v1/users/:id", &[perms::USER_READ]),
    // Roles
    ("POST", "/api/v1/roles", &[perms::ROLE_CREATE]),
    ("GET", "/api/v1/roles", &[perms::ROLE_LIST]),
    ("GET", "/api/v1/roles/:id", &[perms::ROLE_READ]),
    ("PATCH", "/api/v1/roles/:id", &[perms::ROLE_UPDATE]),
    ("DELETE", "/api/v1/roles/:id", &[perms::ROLE_DELETE]),
    // Permissions
    ("POST", "/api/v1/permissions", &[perms::PERMISSION_CREATE]),
    ("GET", "/api/v1/permissions", &[perms::PERMISSION_LIST]),
    ("GET", "/api/v1/permissions/:id", &[perms::PERMISSION_READ]),
    ("PATCH", "/api/v1/permissions/:id", &[perms::PERMISSION_UPDATE]),
    ("DELETE", "/api/v1/permissions/:id", &[perms::PERMISSION_DELETE]),
    // Role <-> permission
    (
        "POST",
        "/api/v1/role-permissions/toggle",
        &[perms::ROLE_PERMISSION_TOGGLE],
    ),
    (
        "GET",
        "/api/v1/role-permissions",
        &[perms::ROLE_PERMISSION_LIST],
    ),
    (
        "GET",
        "/api/v1/role-permissions/:role_id",
        &[perms::ROLE_PERMISSION_READ],
    ),
    // User <-> role
    ("POST", "/api/v1/user-roles/toggle", &[perms::USER_ROLE_TOGGLE]),
    ("GET", "/api/v1/user-roles", &[perms::USER_ROLE_LIST]),
    ("GET", "/api/v1/user-roles/:user_id", &[perms::USER_ROLE_READ]),
];

pub fn required_permissions(method: &Method, matched_path: &str) -> &'static [&'static str] {
    OPERATION_PERMISSIONS
        .iter()
        .find(|(m, path, _)| *m == method.as_str() && *path == matched_path)
        .map(|(_, _, required)| *required)
        .unwrap_or(&[])
}

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/refresh", post(handlers::auth::refresh_token))
        .route(
            "/api/v1/auth/password/forgot",
            post(handlers::password::forgot_password),
        )
        .route(
            "/api/v1/auth/password/reset",
            post(handlers::password::reset_password),
        )
        .route(
            "/api/v1/auth/verification/verify",
            post(handlers::verification::verify_email),
        )
        .route(
            "/api/v1/auth/verification/resend",
            post(handlers::verification::resend_verification),
        )
        .route("/health", get(health_check))
        .route("/readiness", get(readiness_check))
        .route("/metrics", get(metrics::metrics_handler));

    let protected = Router::new()
        .route("/api/v1/auth/logout", post(handlers::auth::logout))
        .route(
            "/api/v1/auth/sessions",
            get(handlers::sessions::list_sessions),
        )
        .route(
            "/api/v1/auth/sessions/logout-all",
            post(handlers::sessions::logout_all),
        )
        .route(
            "/api/v1/auth/sessions/cleanup",
            post(handlers::sessions::cleanup_expired),
        )
        .route(
            "/api/v1/auth/sessions/:session_id",
            delete(handlers::sessions::revoke_session),
        )
        .route("/api/v1/users", get(handlers::users::list_users))
        .route("/api/v1/users/:id", get(handlers::users::get_user))
        .route(
            "/api/v1/roles",
            post(handlers::roles::create_role).get(handlers::roles::list_roles),
        )
        .route(
            "/api/v1/roles/:id",
            get(handlers::roles::get_role)
                .patch(handlers::roles::update_role)
                .delete(handlers::roles::delete_role),
        )
        .route(
            "/api/v1/permissions",
            post(handlers::permissions::create_permission)
                .get(handlers::permissions::list_permissions),
        )
        .route(
            "/api/v1/permissions/:id",
            get(handlers::permissions::get_permission)
                .patch(handlers::permissions::update_permission)
                .delete(handlers::permissions::delete_permission),
        )
        .route(
            "/api/v1/role-permissions/toggle",
            post(handlers::role_permission::toggle_role_permission),
        )
        .route(
            "/api/v1/role-permissions",
            get(handlers::role_permission::list_role_permissions),
        )
        .route(
            "/api/v1/role-permissions/:role_id",
            get(handlers::role_permission::role_permissions),
        )
        .route(
            "/api/v1/user-roles/toggle",
            post(handlers::user_role::toggle_user_role),
        )
        .route(
            "/api/v1/user-roles",
            get(handlers::user_role::list_user_roles),
        )
        .route(
            "/api/v1/user-roles/:user_id",
            get(handlers::user_role::user_roles),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .route_layer(from_fn(metrics::track_http_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn readiness_check() -> &'static str {
    "READY"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_routes_are_permission_gated() {
        assert_eq!(
            required_permissions(&Method::GET, "/api/v1/auth/sessions"),
            &[perms::SESSION_LIST]
        );
        assert_eq!(
            required_permissions(&Method::DELETE, "/api/v1/auth/sessions/:session_id"),
            &[perms::SESSION_REVOKE]
        );
        assert_eq!(
            required_permissions(&Method::POST, "/api/v1/auth/sessions/cleanup"),
            &[perms::SESSION_DELETE_EXPIRED]
        );
    }

    #[test]
    fn logout_requires_only_authentication() {
        assert!(required_permissions(&Method::POST, "/api/v1/auth/logout").is_empty());
    }

    #[test]
    fn method_distinguishes_operations() {
        assert_eq!(
            required_permissions(&Method::POST, "/api/v1/roles"),
            &[perms::ROLE_CREATE]
        );
        assert_eq!(
            required_permissions(&Method::GET, "/api/v1/roles"),
            &[perms::ROLE_LIST]
        );
    }

    #[test]
    fn unknown_routes_require_nothing() {
        assert!(required_permissions(&Method::GET, "/api/v1/unknown").is_empty());
    }

    #[test]
    fn table_routes_all_exist_in_router() {
        // Every table entry must use the exact matched-path syntax of a
        // registered route, or the middleware would silently skip the check.
        let registered: &[(&str, &str)] = &[
            ("GET", "/api/v1/auth/sessions"),
            ("DELETE", "/api/v1/auth/sessions/:session_id"),
            ("POST", "/api/v1/auth/sessions/logout-all"),
            ("POST", "/api/v1/auth/sessions/cleanup"),
            ("GET", "/api/v1/users"),
            ("GET", "/api/v1/users/:id"),
            ("POST", "/api/v1/roles"),
            ("GET", "/api/v1/roles"),
            ("GET", "/api/v1/roles/:id"),
            ("PATCH", "/api/v1/roles/:id"),
            ("DELETE", "/api/v1/roles/:id"),
            ("POST", "/api/v1/permissions"),
            ("GET", "/api/v1/permissions"),
            ("GET", "/api/v1/permissions/:id"),
            ("PATCH", "/api/v1/permissions/:id"),
            ("DELETE", "/api/v1/permissions/:id"),
            ("POST", "/api/v1/role-permissions/toggle"),
            ("GET", "/api/v1/role-permissions"),
            ("GET", "/api/v1/role-permissions/:role_id"),
            ("POST", "/api/v1/user-roles/toggle"),
            ("GET", "/api/v1/user-roles"),
            ("GET", "/api/v1/user-roles/:user_id"),
        ];

        for (method, path, _) in OPERATION_PERMISSIONS {
            assert!(
                registered.contains(&(*method, *path)),
                "table entry {} {} does not match a registered route",
                method,
                path
            );
        }
    }
}
