use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, FieldMessage, TokenError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Invalid input: {0:?}")]
    Validation(Vec<FieldMessage>),

    #[error("User not found")]
    NotFound,

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Password is incorrect")]
    InvalidPassword,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(messages) => AppError::Validation(messages),
            UserError::NotFound => AppError::NotFound("User not found.".to_string()),
            UserError::DuplicateEmail(_) => AppError::Conflict("User exists already!".to_string()),
            UserError::InvalidPassword => {
                AppError::Unauthenticated("Password is incorrect.".to_string())
            }
            UserError::PasswordHash(msg)
            | UserError::Token(msg)
            | UserError::Database(msg)
            | UserError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for UserError {
    fn from(err: bcrypt::BcryptError) -> Self {
        UserError::PasswordHash(err.to_string())
    }
}

impl From<TokenError> for UserError {
    fn from(err: TokenError) -> Self {
        UserError::Token(err.to_string())
    }
}
