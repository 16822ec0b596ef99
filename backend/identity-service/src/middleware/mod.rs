pub mod auth;
pub mod cookies;

pub use auth::{require_auth, CurrentUser};
