//! Access to the users that own products.
//!
//! The products domain only needs an owner's display name and the ability
//! to keep the owner's product list in step. The application wires this to
//! the users domain.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::Creator;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductOwners: Send + Sync {
    async fn find_owner(&self, user_id: Uuid) -> ProductResult<Option<Creator>>;

    /// Owners for the given ids; unknown ids are skipped
    async fn find_owners(&self, user_ids: &[Uuid]) -> ProductResult<Vec<Creator>>;

    /// Append to the owner's product list; false if the owner is gone
    async fn attach_product(&self, user_id: Uuid, product_id: Uuid) -> ProductResult<bool>;

    /// Remove from the owner's product list; false if the owner is gone
    async fn detach_product(&self, user_id: Uuid, product_id: Uuid) -> ProductResult<bool>;
}

#[derive(Debug, Clone)]
struct OwnerEntry {
    name: String,
    products: Vec<Uuid>,
}

/// In-memory owner registry (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryOwners {
    owners: Arc<RwLock<HashMap<Uuid, OwnerEntry>>>,
}

impl InMemoryOwners {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_owner(&self, user_id: Uuid, name: &str) {
        self.owners.write().await.insert(
            user_id,
            OwnerEntry {
                name: name.to_string(),
                products: Vec::new(),
            },
        );
    }

    pub async fn remove_owner(&self, user_id: Uuid) {
        self.owners.write().await.remove(&user_id);
    }

    /// The owner's product list, oldest first
    pub async fn products_of(&self, user_id: Uuid) -> Vec<Uuid> {
        self.owners
            .read()
            .await
            .get(&user_id)
            .map(|entry| entry.products.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ProductOwners for InMemoryOwners {
    async fn find_owner(&self, user_id: Uuid) -> ProductResult<Option<Creator>> {
        Ok(self.owners.read().await.get(&user_id).map(|entry| Creator {
            id: user_id,
            name: entry.name.clone(),
        }))
    }

    async fn find_owners(&self, user_ids: &[Uuid]) -> ProductResult<Vec<Creator>> {
        let owners = self.owners.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| {
                owners.get(id).map(|entry| Creator {
                    id: *id,
                    name: entry.name.clone(),
                })
            })
            .collect())
    }

    async fn attach_product(&self, user_id: Uuid, product_id: Uuid) -> ProductResult<bool> {
        let mut owners = self.owners.write().await;
        Ok(owners
            .get_mut(&user_id)
            .map(|entry| entry.products.push(product_id))
            .is_some())
    }

    async fn detach_product(&self, user_id: Uuid, product_id: Uuid) -> ProductResult<bool> {
        let mut owners = self.owners.write().await;
        Ok(owners
            .get_mut(&user_id)
            .map(|entry| entry.products.retain(|id| *id != product_id))
            .is_some())
    }
}
