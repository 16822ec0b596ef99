//! Configuration management
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_host")]
    pub server_host: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Base URL embedded in verification / password-reset email links.
    #[serde(default = "default_app_url")]
    pub app_url: String,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default = "default_from_email")]
    pub from_email: String,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default = "default_sweep_interval")]
    pub session_sweep_interval_secs: u64,
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_email() -> String {
    "noreply@localhost".to_string()
}

fn default_from_name() -> String {
    "Identity Service".to_string()
}

fn default_sweep_interval() -> u64 {
    3600
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Secure cookies and suppressed error details hinge on this flag.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_host: default_server_host(),
            server_port: default_server_port(),
            database_url: "postgres://localhost/identity".to_string(),
            jwt_secret: "test-secret".to_string(),
            environment: default_environment(),
            app_url: default_app_url(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            session_sweep_interval_secs: default_sweep_interval(),
        }
    }

    #[test]
    fn development_is_not_production() {
        assert!(!base_config().is_production());
    }

    #[test]
    fn production_flag() {
        let mut config = base_config();
        config.environment = "production".to_string();
        assert!(config.is_production());
    }
}
