use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; fails with `DuplicateEmail` if the email is taken
    async fn insert(&self, user: User) -> UserResult<User>;

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Users for the given ids; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[Uuid]) -> UserResult<Vec<User>>;

    /// Overwrite the status and return the updated user
    async fn update_status(&self, id: Uuid, status: &str) -> UserResult<Option<User>>;

    /// Append a product id to the owner's list; false if the user is missing
    async fn push_product(&self, user_id: Uuid, product_id: Uuid) -> UserResult<bool>;

    /// Remove a product id from the owner's list; false if the user is missing
    async fn pull_product(&self, user_id: Uuid, product_id: Uuid) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn update_status(&self, id: Uuid, status: &str) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.status = status.to_string();
            user.updated_at = chrono::Utc::now();
            user.clone()
        }))
    }

    async fn push_product(&self, user_id: Uuid, product_id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;
        Ok(users
            .get_mut(&user_id)
            .map(|user| {
                user.products.push(product_id);
                user.updated_at = chrono::Utc::now();
            })
            .is_some())
    }

    async fn pull_product(&self, user_id: Uuid, product_id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;
        Ok(users
            .get_mut(&user_id)
            .map(|user| {
                user.products.retain(|id| *id != product_id);
                user.updated_at = chrono::Utc::now();
            })
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::new(email.to_string(), "Max".to_string(), "hash".to_string())
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryUserRepository::new();
        let created = repo.insert(user("a@b.com")).await.unwrap();

        let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@b.com");

        let by_email = repo.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("a@b.com")).await.unwrap();

        let result = repo.insert(user("a@b.com")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_push_and_pull_product() {
        let repo = InMemoryUserRepository::new();
        let owner = repo.insert(user("a@b.com")).await.unwrap();
        let first = Uuid::now_v7();
        let second = Uuid::now_v7();

        assert!(repo.push_product(owner.id, first).await.unwrap());
        assert!(repo.push_product(owner.id, second).await.unwrap());
        assert!(repo.pull_product(owner.id, first).await.unwrap());

        let owner = repo.find_by_id(owner.id).await.unwrap().unwrap();
        assert_eq!(owner.products, vec![second]);
    }

    #[tokio::test]
    async fn test_owner_list_updates_on_missing_user() {
        let repo = InMemoryUserRepository::new();
        assert!(!repo.push_product(Uuid::now_v7(), Uuid::now_v7()).await.unwrap());
        assert!(!repo.pull_product(Uuid::now_v7(), Uuid::now_v7()).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_status() {
        let repo = InMemoryUserRepository::new();
        let created = repo.insert(user("a@b.com")).await.unwrap();

        let updated = repo.update_status(created.id, "busy").await.unwrap().unwrap();
        assert_eq!(updated.status, "busy");
        assert!(repo.update_status(Uuid::now_v7(), "busy").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_ids_skips_unknown() {
        let repo = InMemoryUserRepository::new();
        let a = repo.insert(user("a@b.com")).await.unwrap();
        let b = repo.insert(user("c@d.com")).await.unwrap();

        let found = repo
            .find_by_ids(&[b.id, Uuid::now_v7(), a.id])
            .await
            .unwrap();
        let ids: Vec<_> = found.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }
}
