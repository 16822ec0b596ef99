//! Business logic services
pub mod auth_service;
pub mod email;
pub mod password_service;
pub mod session_service;
pub mod verification_service;

pub use auth_service::AuthService;
pub use email::{EmailConfig, EmailService};
pub use password_service::PasswordService;
pub use session_service::SessionService;
pub use verification_service::VerificationService;
