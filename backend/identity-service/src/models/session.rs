use axum::http::{header, HeaderMap};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One issued refresh token. `id` is the token's `jti`; the row is the
/// single authority for whether that refresh token is still valid.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshSession {
    pub id: String,
    pub user_id: Uuid,
    pub device_info: String,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl RefreshSession {
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Session projection for session-management UIs. Carries neither the raw
/// token nor anything derived from the credential hash.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SessionInfo {
    pub id: String,
    pub device_info: String,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Client metadata recorded alongside each refresh session.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub user_agent: String,
    pub ip_address: String,
}

impl DeviceInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| "Unknown".to_string());

        let ip_address = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .or_else(|| {
                headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "Unknown".to_string());

        DeviceInfo {
            user_agent,
            ip_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn device_info_defaults_to_unknown() {
        let info = DeviceInfo::from_headers(&HeaderMap::new());
        assert_eq!(info.user_agent, "Unknown");
        assert_eq!(info.ip_address, "Unknown");
    }

    #[test]
    fn device_info_takes_first_forwarded_address() {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.0"));
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );

        let info = DeviceInfo::from_headers(&headers);
        assert_eq!(info.user_agent, "curl/8.0");
        assert_eq!(info.ip_address, "203.0.113.9");
    }

    #[test]
    fn expired_session_is_detected() {
        let session = RefreshSession {
            id: "abc".to_string(),
            user_id: Uuid::new_v4(),
            device_info: "Unknown".to_string(),
            ip_address: "Unknown".to_string(),
            created_at: Utc::now() - chrono::Duration::days(8),
            expires_at: Utc::now() - chrono::Duration::days(1),
        };
        assert!(session.is_expired());
    }
}
