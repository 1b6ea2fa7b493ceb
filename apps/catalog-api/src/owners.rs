//! Products see their owners through the users repository.

use async_trait::async_trait;
use domain_products::{Creator, ProductError, ProductOwners, ProductResult};
use domain_users::{User, UserError, UserRepository};
use std::sync::Arc;
use uuid::Uuid;

/// [`ProductOwners`] backed by a [`UserRepository`].
#[derive(Clone)]
pub struct UserOwners {
    users: Arc<dyn UserRepository>,
}

impl UserOwners {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

fn creator(user: User) -> Creator {
    Creator {
        id: user.id,
        name: user.name,
    }
}

fn owner_error(err: UserError) -> ProductError {
    match err {
        UserError::Database(msg) => ProductError::Database(msg),
        other => ProductError::Internal(other.to_string()),
    }
}

#[async_trait]
impl ProductOwners for UserOwners {
    async fn find_owner(&self, user_id: Uuid) -> ProductResult<Option<Creator>> {
        let user = self.users.find_by_id(user_id).await.map_err(owner_error)?;
        Ok(user.map(creator))
    }

    async fn find_owners(&self, user_ids: &[Uuid]) -> ProductResult<Vec<Creator>> {
        let users = self.users.find_by_ids(user_ids).await.map_err(owner_error)?;
        Ok(users.into_iter().map(creator).collect())
    }

    async fn attach_product(&self, user_id: Uuid, product_id: Uuid) -> ProductResult<bool> {
        self.users
            .push_product(user_id, product_id)
            .await
            .map_err(owner_error)
    }

    async fn detach_product(&self, user_id: Uuid, product_id: Uuid) -> ProductResult<bool> {
        self.users
            .pull_product(user_id, product_id)
            .await
            .map_err(owner_error)
    }
}
