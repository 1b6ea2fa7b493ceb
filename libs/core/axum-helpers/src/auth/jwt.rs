use super::config::{JwtConfig, MAX_TOKEN_TTL};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Default token lifetime in seconds.
pub const TOKEN_TTL: i64 = 3600;

/// Signed token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtClaims {
    pub user_id: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// The caller a verified token speaks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("token subject is not a valid user id: {0}")]
    InvalidSubject(String),
}

/// Issues and verifies HS256 tokens.
#[derive(Clone)]
pub struct JwtAuth {
    keys: Arc<Keys>,
    ttl: Duration,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.as_bytes();
        tracing::info!(ttl_secs = config.ttl_secs, "JWT auth initialized");
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
            }),
            ttl: Duration::seconds(config.ttl_secs.clamp(1, MAX_TOKEN_TTL)),
        }
    }

    /// Issue a token for `user_id` that expires after the configured lifetime.
    pub fn issue_token(&self, user_id: Uuid, email: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = JwtClaims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.keys.encoding,
        )?;
        Ok(token)
    }

    /// Verify the signature and expiry, then decode the claims.
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, TokenError> {
        let data = decode::<JwtClaims>(
            token,
            &self.keys.decoding,
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }

    /// Verify a token and resolve the identity it carries.
    pub fn identify(&self, token: &str) -> Result<Identity, TokenError> {
        let claims = self.verify_token(token)?;
        let user_id = Uuid::parse_str(&claims.user_id)
            .map_err(|_| TokenError::InvalidSubject(claims.user_id.clone()))?;
        Ok(Identity {
            user_id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("test-secret-that-is-at-least-32-characters"))
    }

    #[test]
    fn test_issue_and_identify() {
        let auth = auth();
        let user_id = Uuid::now_v7();

        let token = auth.issue_token(user_id, "a@b.com").unwrap();
        let identity = auth.identify(&token).unwrap();

        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.email, "a@b.com");
    }

    #[test]
    fn test_token_expires_after_one_hour() {
        let auth = auth();
        let token = auth.issue_token(Uuid::now_v7(), "a@b.com").unwrap();
        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL);
    }

    #[test]
    fn test_lifetime_follows_config() {
        let config =
            JwtConfig::new("test-secret-that-is-at-least-32-characters").with_ttl_secs(60);
        let auth = JwtAuth::new(&config);
        let token = auth.issue_token(Uuid::now_v7(), "a@b.com").unwrap();
        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn test_oversized_lifetime_is_clamped() {
        let config = JwtConfig::new("test-secret-that-is-at-least-32-characters")
            .with_ttl_secs(i64::MAX);
        let auth = JwtAuth::new(&config);
        let token = auth.issue_token(Uuid::now_v7(), "a@b.com").unwrap();
        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, MAX_TOKEN_TTL);
    }

    #[test]
    fn test_claims_are_camel_case() {
        let claims = JwtClaims {
            user_id: "u".into(),
            email: "e".into(),
            iat: 1,
            exp: 2,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], "u");
    }

    #[test]
    fn test_rejects_token_signed_with_other_secret() {
        let other = JwtAuth::new(&JwtConfig::new("another-secret-that-is-at-least-32-chars"));
        let token = other.issue_token(Uuid::now_v7(), "a@b.com").unwrap();
        assert!(matches!(auth().identify(&token), Err(TokenError::Jwt(_))));
    }

    #[test]
    fn test_rejects_expired_token() {
        let auth = auth();
        let claims = JwtClaims {
            user_id: Uuid::now_v7().to_string(),
            email: "a@b.com".into(),
            iat: Utc::now().timestamp() - 2 * TOKEN_TTL,
            exp: Utc::now().timestamp() - TOKEN_TTL,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret-that-is-at-least-32-characters"),
        )
        .unwrap();

        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn test_rejects_non_uuid_subject() {
        let auth = auth();
        let claims = JwtClaims {
            user_id: "not-a-uuid".into(),
            email: "a@b.com".into(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + TOKEN_TTL,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret-that-is-at-least-32-characters"),
        )
        .unwrap();

        assert!(matches!(
            auth.identify(&token),
            Err(TokenError::InvalidSubject(_))
        ));
    }
}
