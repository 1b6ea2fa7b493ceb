use axum_helpers::JwtAuth;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{AuthData, CreateUser, LoginRequest, User, UserResponse};
use crate::repository::UserRepository;

/// bcrypt work factor for stored passwords.
pub const PASSWORD_HASH_COST: u32 = 12;

/// Lowest work factor bcrypt accepts; keeps hashing fast in tests.
pub const MIN_HASH_COST: u32 = 4;

/// Service layer for registration, login and the caller's own account
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    jwt: JwtAuth,
    hash_cost: u32,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, jwt: JwtAuth) -> Self {
        Self {
            repository,
            jwt,
            hash_cost: PASSWORD_HASH_COST,
        }
    }

    /// Override the bcrypt cost (tests use [`MIN_HASH_COST`]).
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Register a new account
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        let errors = input.input_errors();
        if !errors.is_empty() {
            return Err(UserError::Validation(errors.into_messages()));
        }

        if self.repository.find_by_email(&input.email).await?.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let password_hash = self.hash_password(input.password).await?;
        let user = User::new(input.email, input.name, password_hash);

        let created = self.repository.insert(user).await?;
        Ok(created.into())
    }

    /// Check credentials and issue a token
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginRequest) -> UserResult<AuthData> {
        let user = self
            .repository
            .find_by_email(&input.email)
            .await?
            .ok_or(UserError::NotFound)?;

        if !self.verify_password(input.password, user.password.clone()).await? {
            return Err(UserError::InvalidPassword);
        }

        let token = self.jwt.issue_token(user.id, &user.email)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthData {
            token,
            user_id: user.id.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound)?;
        Ok(user.into())
    }

    #[instrument(skip(self))]
    pub async fn get_status(&self, id: Uuid) -> UserResult<String> {
        Ok(self.get_user(id).await?.status)
    }

    #[instrument(skip(self, status))]
    pub async fn update_status(&self, id: Uuid, status: &str) -> UserResult<UserResponse> {
        let user = self
            .repository
            .update_status(id, status)
            .await?
            .ok_or(UserError::NotFound)?;

        tracing::info!(user_id = %id, "Status updated");
        Ok(user.into())
    }

    async fn hash_password(&self, password: String) -> UserResult<String> {
        let cost = self.hash_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .map_err(UserError::from)
    }

    async fn verify_password(&self, password: String, hash: String) -> UserResult<bool> {
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .map_err(UserError::from)
    }
}
