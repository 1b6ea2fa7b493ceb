//! Domain errors as GraphQL errors.
//!
//! The HTTP status travels in the `code` extension; validation failures also
//! carry their messages in `data`.

use async_graphql::{Error, ErrorExtensions};
use axum_helpers::AppError;

/// Message used for every validation failure.
pub const INVALID_INPUT: &str = "Invalid input.";

pub fn graphql_error(err: impl Into<AppError>) -> Error {
    let err: AppError = err.into();
    let code = err.status_code().as_u16();
    let data = err
        .data()
        .and_then(|messages| async_graphql::to_value(messages).ok());

    let message = match err {
        AppError::Validation(_) => INVALID_INPUT.to_string(),
        ref other => other.client_message(),
    };

    Error::new(message).extend_with(|_, extensions| {
        extensions.set("code", code);
        if let Some(data) = &data {
            extensions.set("data", data.clone());
        }
    })
}

/// `.gql()?` in resolvers keeps the status code that a bare `?` would drop.
pub trait GraphqlResultExt<T> {
    fn gql(self) -> async_graphql::Result<T>;
}

impl<T, E: Into<AppError>> GraphqlResultExt<T> for Result<T, E> {
    fn gql(self) -> async_graphql::Result<T> {
        self.map_err(graphql_error)
    }
}
