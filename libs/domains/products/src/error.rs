use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, FieldMessage};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Invalid input: {0:?}")]
    Validation(Vec<FieldMessage>),

    #[error("Not authenticated")]
    Unauthenticated,

    /// The caller's token is valid but their account is gone
    #[error("Invalid user: {0}")]
    InvalidUser(Uuid),

    #[error("Not authorized to modify product {0}")]
    Forbidden(Uuid),

    #[error("Product not found: {0}")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Validation(messages) => AppError::Validation(messages),
            ProductError::Unauthenticated => AppError::unauthenticated(),
            ProductError::InvalidUser(_) => AppError::Unauthenticated("Invalid user.".to_string()),
            ProductError::Forbidden(_) => AppError::forbidden(),
            ProductError::NotFound(_) => {
                AppError::NotFound("Could not find product.".to_string())
            }
            ProductError::Database(msg) | ProductError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let id = Uuid::now_v7();
        let cases = [
            (ProductError::Validation(vec![]), StatusCode::UNPROCESSABLE_ENTITY),
            (ProductError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ProductError::InvalidUser(id), StatusCode::UNAUTHORIZED),
            (ProductError::Forbidden(id), StatusCode::FORBIDDEN),
            (ProductError::NotFound(id), StatusCode::NOT_FOUND),
            (ProductError::Database("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_client_messages() {
        let id = Uuid::now_v7();
        assert_eq!(
            AppError::from(ProductError::NotFound(id)).client_message(),
            "Could not find product."
        );
        assert_eq!(
            AppError::from(ProductError::Forbidden(id)).client_message(),
            "Not authorized!"
        );
        assert_eq!(
            AppError::from(ProductError::InvalidUser(id)).client_message(),
            "Invalid user."
        );
        assert_eq!(
            AppError::from(ProductError::Database("secret detail".into())).client_message(),
            "An internal server error occurred."
        );
    }
}
