use super::jwt::{Identity, JwtAuth};
use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Populates the request's authentication context.
///
/// Never rejects: a valid bearer token inserts an [`Identity`] into the
/// request extensions, anything else leaves the request anonymous. Handlers
/// decide whether an identity is required through [`CurrentUser`] or
/// [`MaybeIdentity`].
///
/// ```ignore
/// let app = Router::new()
///     .route("/api/products", post(create_product))
///     .layer(axum::middleware::from_fn_with_state(
///         jwt_auth.clone(),
///         auth_context_middleware,
///     ));
/// ```
pub async fn auth_context_middleware(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match auth.identify(token) {
            Ok(identity) => {
                request.extensions_mut().insert(identity);
            }
            Err(e) => {
                tracing::debug!("JWT verification failed: {}", e);
            }
        }
    }

    next.run(request).await
}

/// Extractor requiring an authenticated caller; rejects with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(AppError::unauthenticated)
    }
}

/// Extractor yielding the caller's identity when one was established.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(parts.extensions.get::<Identity>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use axum::{
        Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("test-secret-that-is-at-least-32-characters"))
    }

    fn app(auth: JwtAuth) -> Router {
        Router::new()
            .route(
                "/private",
                get(|CurrentUser(identity): CurrentUser| async move { identity.email }),
            )
            .route(
                "/public",
                get(|MaybeIdentity(identity): MaybeIdentity| async move {
                    identity.map_or_else(|| "anonymous".to_string(), |i| i.email)
                }),
            )
            .layer(from_fn_with_state(auth, auth_context_middleware))
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn test_valid_token_populates_identity() {
        let auth = auth();
        let token = auth.issue_token(Uuid::now_v7(), "a@b.com").unwrap();

        let response = app(auth)
            .oneshot(
                HttpRequest::builder()
                    .uri("/private")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "a@b.com");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthenticated() {
        let response = app(auth())
            .oneshot(
                HttpRequest::builder()
                    .uri("/private")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_leaves_request_anonymous() {
        let response = app(auth())
            .oneshot(
                HttpRequest::builder()
                    .uri("/public")
                    .header(AUTHORIZATION, "Bearer not-a-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "anonymous");
    }
}
