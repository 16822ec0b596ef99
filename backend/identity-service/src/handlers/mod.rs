//! HTTP request handlers (REST API)
pub mod auth;
pub mod password;
pub mod permissions;
pub mod role_permission;
pub mod roles;
pub mod sessions;
pub mod user_role;
pub mod users;
pub mod verification;

// Re-export the credential lifecycle handlers for easy access
pub use auth::{login, logout, refresh_token, register, LoginResponse, MessageResponse};
pub use password::{forgot_password, reset_password};
pub use verification::{resend_verification, verify_email};
