//! Who may change a product.

use axum_helpers::Identity;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductDetails};

/// Ownership capability of one product: only its creator may mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    product: Uuid,
    creator: Uuid,
}

impl Ownership {
    pub fn of(product: &Product) -> Self {
        Self {
            product: product.id,
            creator: product.creator,
        }
    }

    pub fn of_details(product: &ProductDetails) -> Self {
        Self {
            product: product.id,
            creator: product.creator.id,
        }
    }

    pub fn permits(&self, identity: &Identity) -> bool {
        self.creator == identity.user_id
    }

    /// `Forbidden` unless `identity` created the product
    pub fn require(&self, identity: &Identity) -> ProductResult<()> {
        if self.permits(identity) {
            Ok(())
        } else {
            Err(ProductError::Forbidden(self.product))
        }
    }
}
