use utoipa::OpenApi;

use crate::handlers::auth::{
    ErrorResponse, LoginData, LoginResponse, MessageResponse, RefreshTokenResponse,
};
use crate::handlers::sessions::CleanupResponse;
use crate::handlers::verification::VerifyEmailResponse;
use crate::models::user::{
    EmailRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, VerifyEmailRequest,
};
use crate::models::{PublicUser, SessionInfo};

/// OpenAPI document for the credential-lifecycle endpoints.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::refresh_token,
        crate::handlers::auth::logout,
        crate::handlers::password::forgot_password,
        crate::handlers::password::reset_password,
        crate::handlers::verification::verify_email,
        crate::handlers::verification::resend_verification,
        crate::handlers::sessions::list_sessions,
        crate::handlers::sessions::revoke_session,
        crate::handlers::sessions::logout_all,
        crate::handlers::sessions::cleanup_expired
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        EmailRequest,
        ResetPasswordRequest,
        VerifyEmailRequest,
        MessageResponse,
        LoginData,
        LoginResponse,
        RefreshTokenResponse,
        VerifyEmailResponse,
        CleanupResponse,
        ErrorResponse,
        PublicUser,
        SessionInfo
    )),
    tags(
        (name = "Auth", description = "Registration, login, token refresh and logout"),
        (name = "Password", description = "Password reset flow"),
        (name = "Verification", description = "Email verification flow"),
        (name = "Sessions", description = "Refresh-session management")
    )
)]
pub struct ApiDoc;
