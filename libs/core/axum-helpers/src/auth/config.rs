//! Token signing configuration.

use core_config::{ConfigError, FromEnv, env_parse_or, env_required};

use super::jwt::TOKEN_TTL;

/// Minimum accepted secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_TTL: i64 = 365 * 24 * 3600;

/// Secret and lifetime of issued tokens.
///
/// | Variable        | Default | Notes                      |
/// |-----------------|---------|----------------------------|
/// | `JWT_SECRET`    | -       | required, 32 bytes or more |
/// | `JWT_TTL_SECS`  | `3600`  | 1 up to [`MAX_TOKEN_TTL`]  |
///
/// ```ignore
/// let auth = JwtAuth::new(&JwtConfig::from_env()?);
/// let auth = JwtAuth::new(&JwtConfig::new("a-test-secret-of-at-least-32-chars"));
/// ```
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_secs: i64,
}

impl JwtConfig {
    /// Config with the default one hour lifetime.
    ///
    /// # Panics
    /// If `secret` is shorter than [`MIN_SECRET_LEN`]; meant for tests and
    /// literals, use [`FromEnv`] for anything read at runtime.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= MIN_SECRET_LEN,
            "JWT secret must be at least 32 characters"
        );
        Self {
            secret,
            ttl_secs: TOKEN_TTL,
        }
    }

    /// Out-of-range values are clamped when the auth is built.
    pub fn with_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!("must be at least 32 characters (got {})", secret.len()),
            });
        }

        let ttl_secs: i64 = env_parse_or("JWT_TTL_SECS", TOKEN_TTL)?;
        if !(1..=MAX_TOKEN_TTL).contains(&ttl_secs) {
            return Err(ConfigError::ParseError {
                key: "JWT_TTL_SECS".to_string(),
                details: format!("must be between 1 and {MAX_TOKEN_TTL} (got {ttl_secs})"),
            });
        }

        Ok(Self { secret, ttl_secs })
    }
}
