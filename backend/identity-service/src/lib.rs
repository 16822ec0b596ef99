// Identity Service Library

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod permissions;
pub mod routes;
pub mod security;
pub mod services;
pub mod telemetry;

use std::sync::Arc;

use sqlx::PgPool;

pub use error::{ApiError, Result};

use config::Config;
use security::token::TokenCodec;
use services::{
    AuthService, EmailConfig, EmailService, PasswordService, SessionService, VerificationService,
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub tokens: TokenCodec,
    pub auth: AuthService,
    pub sessions: SessionService,
    pub passwords: PasswordService,
    pub verification: VerificationService,
}

impl AppState {
    /// Composition root: every component is constructed here and wired by
    /// explicit reference passing; nothing is looked up ambiently.
    pub fn build(config: Config, db: PgPool) -> Self {
        let config = Arc::new(config);

        let tokens = TokenCodec::new(config.jwt_secret.as_bytes());
        let mailer = Arc::new(EmailService::new(EmailConfig::from_config(&config)));
        if !mailer.is_configured() {
            tracing::warn!("SMTP credentials not configured; outbound mail will fail");
        }

        let sessions = SessionService::new(db.clone(), tokens.clone());
        let auth = AuthService::new(
            db.clone(),
            tokens.clone(),
            sessions.clone(),
            mailer.clone(),
        );
        let passwords = PasswordService::new(
            db.clone(),
            tokens.clone(),
            sessions.clone(),
            mailer.clone(),
        );
        let verification = VerificationService::new(db.clone(), tokens.clone(), mailer);

        AppState {
            db,
            config,
            tokens,
            auth,
            sessions,
            passwords,
            verification,
        }
    }
}
