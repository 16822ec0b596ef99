//! Router-level tests for the validation and authentication boundary.
//!
//! Every request here is rejected before any storage round-trip, so these
//! run against a lazily-connecting pool without a database.
mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use identity_service::routes;

fn app() -> Router {
    routes::build_router(common::lazy_state())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn assert_error_envelope(status: StatusCode, body: &Value, code: &str) {
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["statusCode"], json!(status.as_u16()));
    assert_eq!(body["error"], json!(code));
    assert!(body["message"].is_string());
    if cfg!(debug_assertions) {
        assert!(
            body.get("details").is_some(),
            "details should be present on development builds"
        );
    }
}

#[tokio::test]
async fn register_rejects_invalid_email() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/v1/auth/register",
            json!({"email": "not-an-email", "name": "Bob", "password": "longenough"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(status, &body, "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn register_rejects_short_password() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/v1/auth/register",
            json!({"email": "bob@example.com", "name": "Bob", "password": "short"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(status, &body, "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("password"));
}

#[tokio::test]
async fn login_rejects_invalid_email() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/v1/auth/login",
            json!({"email": "nope", "password": "whatever"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(status, &body, "VALIDATION_ERROR");
}

#[tokio::test]
async fn refresh_without_token_is_unauthorized() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/refresh")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_envelope(status, &body, "UNAUTHORIZED");
    assert_eq!(body["message"], json!("Refresh token not provided"));
}

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/users")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_envelope(status, &body, "UNAUTHORIZED");
    assert_eq!(body["message"], json!("Missing access token"));
}

#[tokio::test]
async fn protected_route_with_garbage_token_is_unauthorized() {
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/users")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_envelope(status, &body, "UNAUTHORIZED");
}

#[tokio::test]
async fn refresh_token_is_not_accepted_as_access_token() {
    let state = common::lazy_state();
    let refresh = state
        .tokens
        .sign_refresh(uuid::Uuid::new_v4(), "0123456789abcdef0123456789abcdef")
        .unwrap();
    let app = routes::build_router(state);

    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/users")
        .header(header::AUTHORIZATION, format!("Bearer {}", refresh))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_envelope(status, &body, "UNAUTHORIZED");
}

#[tokio::test]
async fn access_token_via_cookie_is_accepted_for_extraction() {
    // A structurally invalid cookie token must be rejected by verification,
    // not reported as missing.
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/users")
        .header(header::COOKIE, "access_token=garbage")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Invalid or expired access token"));
}

#[tokio::test]
async fn logout_requires_authentication() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/logout")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error_envelope(status, &body, "UNAUTHORIZED");
}

#[tokio::test]
async fn garbage_verification_token_is_bad_request() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/v1/auth/verification/verify",
            json!({"token": "garbage"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(status, &body, "BAD_REQUEST");
    assert_eq!(
        body["message"],
        json!("Invalid or expired verification token")
    );
}

#[tokio::test]
async fn garbage_reset_token_is_bad_request() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/v1/auth/password/reset",
            json!({"token": "garbage", "new_password": "longenough"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(status, &body, "BAD_REQUEST");
    assert_eq!(body["message"], json!("Invalid or expired reset token"));
}

#[tokio::test]
async fn wrong_purpose_token_is_rejected_on_reset() {
    // A verification token must never be accepted by the reset endpoint.
    let state = common::lazy_state();
    let verification = state
        .tokens
        .sign_verification(uuid::Uuid::new_v4(), "bob@example.com")
        .unwrap();
    let app = routes::build_router(state);

    let (status, body) = send(
        app,
        post_json(
            "/api/v1/auth/password/reset",
            json!({"token": verification, "new_password": "longenough"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Invalid or expired reset token"));
}

#[tokio::test]
async fn health_endpoints_respond() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
