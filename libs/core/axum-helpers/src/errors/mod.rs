pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// One entry of a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldMessage {
    pub message: String,
}

impl FieldMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Standard error response structure.
///
/// Returned for every failed REST request:
/// - `code`: integer error code for logs and monitoring (e.g. 1008)
/// - `error`: machine-readable identifier (e.g. "CONFLICT")
/// - `message`: human-readable message
/// - `data`: validation messages, present only for validation failures
///
/// ```json
/// {
///   "code": 1001,
///   "error": "VALIDATION_ERROR",
///   "message": "Validation failed, entered data is incorrect.",
///   "data": [{ "message": "Title is invalid." }]
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: i32,
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<FieldMessage>>,
}

/// Application error type shared by every surface.
///
/// Domain crates convert their own `thiserror` enums into this type; REST
/// handlers return it directly and the GraphQL layer maps it into
/// extension-carrying errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Validation failed: {0:?}")]
    Validation(Vec<FieldMessage>),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// 401 with the default "Not authenticated!" message.
    pub fn unauthenticated() -> Self {
        Self::Unauthenticated(ErrorCode::Unauthenticated.default_message().to_string())
    }

    /// 403 with the default "Not authorized!" message.
    pub fn forbidden() -> Self {
        Self::Forbidden(ErrorCode::Forbidden.default_message().to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::JsonExtractorRejection(e) => e.status(),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::ValidationError,
            Self::JsonExtractorRejection(_) => ErrorCode::InvalidJson,
            Self::BadRequest(_) => ErrorCode::BadRequest,
            Self::Unauthenticated(_) => ErrorCode::Unauthenticated,
            Self::Forbidden(_) => ErrorCode::Forbidden,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Conflict(_) => ErrorCode::Conflict,
            Self::Internal(_) => ErrorCode::InternalError,
            Self::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }

    /// Message safe to show to clients. Internal details are replaced by the
    /// generic message for the error code.
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation(_) | Self::Internal(_) => {
                self.error_code().default_message().to_string()
            }
            Self::JsonExtractorRejection(e) => e.body_text(),
            Self::BadRequest(msg)
            | Self::Unauthenticated(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::ServiceUnavailable(msg) => msg.clone(),
        }
    }

    pub fn data(&self) -> Option<&[FieldMessage]> {
        match self {
            Self::Validation(messages) => Some(messages),
            _ => None,
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        let code = self.error_code();
        ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message: self.client_message(),
            data: self.data().map(<[FieldMessage]>::to_vec),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code().code();

        match &self {
            Self::Internal(msg) => {
                tracing::error!(error_code, "Internal server error: {}", msg);
            }
            Self::ServiceUnavailable(msg) => {
                tracing::warn!(error_code, "Service unavailable: {}", msg);
            }
            Self::JsonExtractorRejection(e) => {
                tracing::warn!(error_code, "JSON extraction error: {:?}", e);
            }
            other => {
                tracing::info!(error_code, "Request failed: {}", other);
            }
        }

        (status, Json(self.to_error_response())).into_response()
    }
}
