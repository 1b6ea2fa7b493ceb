//! Type-safe error codes for API responses.
//!
//! Each error code carries a string identifier for clients, an integer code
//! for logs and a default human-readable message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Input failed one or more validation checks
    ValidationError,

    /// Request body could not be parsed
    InvalidJson,

    /// Requested resource was not found
    NotFound,

    /// Credentials are missing, invalid or expired
    Unauthenticated,

    /// Authenticated caller may not act on the resource
    Forbidden,

    /// Request conflicts with existing state (duplicate email)
    Conflict,

    /// Malformed request that is not a validation failure
    BadRequest,

    // Server errors
    InternalError,

    ServiceUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidJson => "INVALID_JSON",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::BadRequest => "BAD_REQUEST",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Integer code used in structured logs.
    ///
    /// - 1000-1099: client errors
    /// - 1100-1199: server errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidJson => 1002,
            Self::NotFound => 1004,
            Self::Unauthenticated => 1006,
            Self::Forbidden => 1007,
            Self::Conflict => 1008,
            Self::BadRequest => 1010,
            Self::InternalError => 1101,
            Self::ServiceUnavailable => 1102,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Validation failed, entered data is incorrect.",
            Self::InvalidJson => "Failed to parse request body.",
            Self::NotFound => "Resource not found.",
            Self::Unauthenticated => "Not authenticated!",
            Self::Forbidden => "Not authorized!",
            Self::Conflict => "Resource already exists.",
            Self::BadRequest => "Bad request.",
            Self::InternalError => "An internal server error occurred.",
            Self::ServiceUnavailable => "Service is temporarily unavailable.",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
