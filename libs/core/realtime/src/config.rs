use core_config::{ConfigError, FromEnv, env_parse_or};

/// Broadcast channel settings.
///
/// Environment variables:
/// - `BROADCAST_CAPACITY` (default 1024): events buffered per subscriber
///   before a slow socket starts skipping
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RealtimeConfig {
    pub capacity: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

impl FromEnv for RealtimeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let capacity = env_parse_or("BROADCAST_CAPACITY", Self::default().capacity)?;
        if capacity == 0 {
            return Err(ConfigError::ParseError {
                key: "BROADCAST_CAPACITY".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }
        Ok(Self { capacity })
    }
}
