use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{CurrentUser, ErrorResponse, FieldMessage, JsonBody};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::error::UserResult;
use crate::models::{AuthData, CreateUser, LoginRequest, UpdateStatus, UserResponse};
use crate::service::UserService;

pub const TAG: &str = "auth";

/// OpenAPI documentation for the auth endpoints
#[derive(OpenApi)]
#[openapi(
    paths(signup, login, get_status, update_status),
    components(schemas(
        CreateUser,
        LoginRequest,
        AuthData,
        UpdateStatus,
        UserResponse,
        SignupResponse,
        StatusResponse,
        StatusUpdatedResponse,
        ErrorResponse,
        FieldMessage
    )),
    tags((name = TAG, description = "Registration, login and account status"))
)]
pub struct ApiDoc;

/// Auth router, meant to be nested under `/auth`.
///
/// The status routes expect an `Identity` in the request extensions, put
/// there by `auth_context_middleware`.
pub fn router(service: UserService) -> Router {
    Router::new()
        .route("/signup", put(signup))
        .route("/login", post(login))
        .route("/status", get(get_status).patch(update_status))
        .with_state(service)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdatedResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Register a new account
#[utoipa::path(
    put,
    path = "/signup",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = SignupResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
async fn signup(
    State(service): State<UserService>,
    JsonBody(input): JsonBody<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created!".to_string(),
            user_id: user.id.to_string(),
        }),
    ))
}

/// Exchange credentials for a token
#[utoipa::path(
    post,
    path = "/login",
    tag = TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = AuthData),
        (status = 401, description = "Password is incorrect", body = ErrorResponse),
        (status = 404, description = "Unknown email", body = ErrorResponse)
    )
)]
async fn login(
    State(service): State<UserService>,
    JsonBody(input): JsonBody<LoginRequest>,
) -> UserResult<Json<AuthData>> {
    Ok(Json(service.login(input).await?))
}

/// Status of the authenticated user
#[utoipa::path(
    get,
    path = "/status",
    tag = TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current status", body = StatusResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn get_status(
    State(service): State<UserService>,
    CurrentUser(identity): CurrentUser,
) -> UserResult<Json<StatusResponse>> {
    let status = service.get_status(identity.user_id).await?;
    Ok(Json(StatusResponse { status }))
}

/// Overwrite the authenticated user's status
#[utoipa::path(
    patch,
    path = "/status",
    tag = TAG,
    security(("bearer" = [])),
    request_body = UpdateStatus,
    responses(
        (status = 200, description = "Status updated", body = StatusUpdatedResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn update_status(
    State(service): State<UserService>,
    CurrentUser(identity): CurrentUser,
    JsonBody(input): JsonBody<UpdateStatus>,
) -> UserResult<Json<StatusUpdatedResponse>> {
    let user = service
        .update_status(identity.user_id, &input.status)
        .await?;
    Ok(Json(StatusUpdatedResponse {
        message: "Status updated.".to_string(),
        user,
    }))
}
