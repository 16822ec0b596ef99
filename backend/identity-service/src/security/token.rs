//! Signing and verification of the three bearer-token categories: access,
//! refresh, and purpose-scoped single-use tokens (email verification and
//! password reset). Tokens are self-contained HS256 JWTs; refresh tokens are
//! additionally gated by a live session row keyed on their `jti`.
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::{ApiError, Result};

pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;
pub const VERIFICATION_TOKEN_TTL_DAYS: i64 = 1;
pub const RESET_TOKEN_TTL_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
    Verification,
    PasswordReset,
}

/// Claims carried by every token. Which optional fields are present depends
/// on the token kind: access tokens snapshot roles/permissions, refresh
/// tokens carry the session `jti`, purpose tokens carry the email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        }
    }
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // A 15-minute token means 15 minutes.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("failed to sign token: {}", e)))
    }

    /// Access token carrying a roles/permissions snapshot, valid 15 minutes.
    pub fn sign_access(
        &self,
        user_id: Uuid,
        roles: &[String],
        permissions: &[String],
    ) -> Result<String> {
        let now = Utc::now();
        self.sign(&Claims {
            sub: user_id,
            kind: TokenKind::Access,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ACCESS_TOKEN_TTL_MINUTES)).timestamp(),
            roles: roles.to_vec(),
            permissions: permissions.to_vec(),
            jti: None,
            email: None,
        })
    }

    /// Refresh token tied to the session row identified by `jti`, valid 7 days.
    pub fn sign_refresh(&self, user_id: Uuid, jti: &str) -> Result<String> {
        let now = Utc::now();
        self.sign(&Claims {
            sub: user_id,
            kind: TokenKind::Refresh,
            iat: now.timestamp(),
            exp: (now + Duration::days(REFRESH_TOKEN_TTL_DAYS)).timestamp(),
            roles: Vec::new(),
            permissions: Vec::new(),
            jti: Some(jti.to_string()),
            email: None,
        })
    }

    /// Purpose-scoped token restricted to one lifecycle action; never
    /// accepted as an access or refresh token because callers check `type`.
    pub fn sign_purpose(
        &self,
        user_id: Uuid,
        email: &str,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String> {
        let now = Utc::now();
        self.sign(&Claims {
            sub: user_id,
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            roles: Vec::new(),
            permissions: Vec::new(),
            jti: None,
            email: Some(email.to_string()),
        })
    }

    pub fn sign_verification(&self, user_id: Uuid, email: &str) -> Result<String> {
        self.sign_purpose(
            user_id,
            email,
            TokenKind::Verification,
            Duration::days(VERIFICATION_TOKEN_TTL_DAYS),
        )
    }

    pub fn sign_password_reset(&self, user_id: Uuid, email: &str) -> Result<String> {
        self.sign_purpose(
            user_id,
            email,
            TokenKind::PasswordReset,
            Duration::minutes(RESET_TOKEN_TTL_MINUTES),
        )
    }

    /// Structural and signature validity only. Callers must check that the
    /// `type` field matches the purpose they expect.
    pub fn verify(&self, token: &str) -> std::result::Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

/// Generate a unique 128-bit JWT ID, hex encoded.
pub fn generate_jti() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(b"test-signing-secret")
    }

    #[test]
    fn access_token_round_trip() {
        let user_id = Uuid::new_v4();
        let roles = vec!["admin".to_string()];
        let permissions = vec!["user.read".to_string(), "user.list".to_string()];

        let token = codec().sign_access(user_id, &roles, &permissions).unwrap();
        let claims = codec().verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.roles, roles);
        assert_eq!(claims.permissions, permissions);
        assert!(claims.jti.is_none());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_token_carries_jti() {
        let user_id = Uuid::new_v4();
        let jti = generate_jti();

        let token = codec().sign_refresh(user_id, &jti).unwrap();
        let claims = codec().verify(&token).unwrap();

        assert_eq!(claims.kind, TokenKind::Refresh);
        assert_eq!(claims.jti.as_deref(), Some(jti.as_str()));
    }

    #[test]
    fn purpose_tokens_carry_email_and_kind() {
        let user_id = Uuid::new_v4();

        let token = codec().sign_verification(user_id, "bob@x.com").unwrap();
        let claims = codec().verify(&token).unwrap();
        assert_eq!(claims.kind, TokenKind::Verification);
        assert_eq!(claims.email.as_deref(), Some("bob@x.com"));

        let token = codec().sign_password_reset(user_id, "bob@x.com").unwrap();
        let claims = codec().verify(&token).unwrap();
        assert_eq!(claims.kind, TokenKind::PasswordReset);
    }

    #[test]
    fn kind_serializes_under_type_key() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            kind: TokenKind::PasswordReset,
            iat: 0,
            exp: 0,
            roles: Vec::new(),
            permissions: Vec::new(),
            jti: None,
            email: None,
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["type"], "password_reset");
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = codec().sign_access(Uuid::new_v4(), &[], &[]).unwrap();
        // Corrupt the payload segment; the signature no longer matches.
        let tampered = token.replacen('.', ".x", 1);
        assert!(matches!(
            codec().verify(&tampered),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = codec().sign_access(Uuid::new_v4(), &[], &[]).unwrap();
        let other = TokenCodec::new(b"another-secret");
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = codec()
            .sign_purpose(
                Uuid::new_v4(),
                "bob@x.com",
                TokenKind::Verification,
                Duration::minutes(-5),
            )
            .unwrap();
        assert!(matches!(codec().verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(codec().verify("not.a.token").is_err());
        assert!(codec().verify("").is_err());
    }

    #[test]
    fn jti_is_128_bit_hex() {
        let jti = generate_jti();
        assert_eq!(jti.len(), 32);
        assert!(jti.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn jti_is_unique() {
        let jtis: std::collections::HashSet<_> = (0..100).map(|_| generate_jti()).collect();
        assert_eq!(jtis.len(), 100);
    }
}
