use axum_helpers::InputErrors;
use chrono::{DateTime, Utc};
use database::serde_helpers::rfc3339_millis;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Status given to every new account.
pub const DEFAULT_STATUS: &str = "I am new!";

/// Minimum password length.
pub const MIN_PASSWORD_LEN: u64 = 5;

/// Stored user document.
///
/// `password` holds the bcrypt hash. It is persisted but never leaves the
/// service: API responses use [`UserResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub status: String,
    /// Owned products, oldest first
    #[serde(default)]
    pub products: Vec<Uuid>,
    #[serde(with = "rfc3339_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "rfc3339_millis")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            email,
            password: password_hash,
            status: DEFAULT_STATUS.to_string(),
            products: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// User as returned by the API, without the password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: String,
    pub products: Vec<Uuid>,
    #[serde(with = "rfc3339_millis")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "rfc3339_millis")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            status: user.status,
            products: user.products,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Registration input.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl CreateUser {
    /// Email format first, then password length.
    pub fn input_errors(&self) -> InputErrors {
        let mut errors = InputErrors::new();
        errors
            .email(&self.email, "E-Mail is invalid.")
            .min_length(&self.password, MIN_PASSWORD_LEN, "Password too short!");
        errors
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub token: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatus {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(email: &str, password: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            name: "Max".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("a@b.com".into(), "Max".into(), "hash".into());
        assert_eq!(user.status, DEFAULT_STATUS);
        assert!(user.products.is_empty());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_response_omits_password() {
        let user = User::new("a@b.com".into(), "Max".into(), "secret-hash".into());
        let json = serde_json::to_value(UserResponse::from(user.clone())).unwrap();

        assert!(json.get("password").is_none());
        assert_eq!(json["_id"], user.id.to_string());
        assert_eq!(json["status"], "I am new!");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_valid_input() {
        assert!(input("a@b.com", "abcde").input_errors().is_empty());
    }

    #[test]
    fn test_invalid_input_reports_both_checks_in_order() {
        let errors = input("not-an-email", "abc").input_errors();
        let messages: Vec<_> = errors.messages().iter().map(|m| m.message.clone()).collect();
        assert_eq!(messages, vec!["E-Mail is invalid.", "Password too short!"]);
    }

    #[test]
    fn test_empty_password_rejected() {
        assert_eq!(input("a@b.com", "").input_errors().len(), 1);
    }

    #[test]
    fn test_auth_data_is_camel_case() {
        let json = serde_json::to_value(AuthData {
            token: "t".into(),
            user_id: "u".into(),
        })
        .unwrap();
        assert_eq!(json["userId"], "u");
    }
}
