//! Application state management

use axum_helpers::JwtAuth;
use domain_products::{InMemoryProductRepository, ProductRepository, ProductService};
use domain_users::{InMemoryUserRepository, UserRepository, UserService};
use realtime::Broadcaster;
use std::sync::Arc;

use crate::owners::UserOwners;

/// Services shared by the REST, GraphQL and socket surfaces
#[derive(Clone)]
pub struct AppState {
    pub jwt: JwtAuth,
    pub users: UserService,
    pub products: ProductService,
    pub broadcaster: Broadcaster,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        jwt: JwtAuth,
        broadcaster: Broadcaster,
    ) -> Self {
        let owners = Arc::new(UserOwners::new(users.clone()));

        Self {
            users: UserService::new(users, jwt.clone()),
            products: ProductService::new(products, owners),
            jwt,
            broadcaster,
        }
    }

    /// State over in-memory repositories
    pub fn in_memory(jwt: JwtAuth, broadcaster: Broadcaster) -> Self {
        Self::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryProductRepository::new()),
            jwt,
            broadcaster,
        )
    }

    /// Override the bcrypt cost of the users service
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.users = self.users.with_hash_cost(cost);
        self
    }
}
