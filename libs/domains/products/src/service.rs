//! Product Service - the request contract shared by REST and GraphQL
//!
//! Every mutation runs the same sequence on both surfaces: authenticate,
//! validate, look up, check ownership, write, keep the owner's list in step.

use axum_helpers::Identity;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Creator, PAGE_SIZE, Product, ProductDetails, ProductInput, ProductPage};
use crate::owners::ProductOwners;
use crate::policy::Ownership;
use crate::repository::ProductRepository;

/// A freshly created product together with its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedProduct {
    pub product: Product,
    pub creator: Creator,
}

impl CreatedProduct {
    pub fn details(&self) -> ProductDetails {
        self.product.clone().with_creator(self.creator.clone())
    }
}

#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    owners: Arc<dyn ProductOwners>,
}

fn authenticated(identity: Option<&Identity>) -> ProductResult<&Identity> {
    identity.ok_or(ProductError::Unauthenticated)
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>, owners: Arc<dyn ProductOwners>) -> Self {
        Self { repository, owners }
    }

    /// One page of products, newest first, with creators populated.
    ///
    /// Pages below 1 are treated as page 1.
    #[instrument(skip(self))]
    pub async fn list(&self, page: i64) -> ProductResult<ProductPage> {
        let page = page.max(1) as u64;
        let skip = (page - 1).saturating_mul(PAGE_SIZE);

        let total_items = self.repository.count().await?;
        let products = self.repository.list_page(skip, PAGE_SIZE).await?;
        let products = self.populate(products).await?;

        Ok(ProductPage {
            products,
            total_items,
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Products by id, in the order given; missing ids are skipped.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn get_many(&self, ids: &[Uuid]) -> ProductResult<Vec<Product>> {
        let mut found: HashMap<Uuid, Product> = self
            .repository
            .find_by_ids(ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(ids.iter().filter_map(|id| found.remove(id)).collect())
    }

    /// Create a product owned by the caller and append it to their list.
    ///
    /// If the owner's list cannot be updated the product is removed again.
    #[instrument(skip(self, identity, input))]
    pub async fn create(
        &self,
        identity: Option<&Identity>,
        input: ProductInput,
    ) -> ProductResult<CreatedProduct> {
        let identity = authenticated(identity)?;
        let content = input
            .validate()
            .map_err(|errors| ProductError::Validation(errors.into_messages()))?;

        let creator = self
            .owners
            .find_owner(identity.user_id)
            .await?
            .ok_or(ProductError::InvalidUser(identity.user_id))?;

        let product = self
            .repository
            .insert(Product::new(creator.id, content))
            .await?;

        let attached = match self.owners.attach_product(creator.id, product.id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ProductError::InvalidUser(creator.id)),
            Err(e) => Err(e),
        };

        if let Err(e) = attached {
            tracing::warn!(product_id = %product.id, error = %e, "Owner update failed, removing product");
            if let Err(cleanup) = self.repository.delete(product.id).await {
                tracing::error!(product_id = %product.id, error = %cleanup, "Compensating delete failed");
            }
            return Err(e);
        }

        tracing::info!(product_id = %product.id, user_id = %creator.id, "Product created");
        Ok(CreatedProduct { product, creator })
    }

    /// Overwrite the caller's product.
    ///
    /// Checks run as: authentication, validation, lookup, ownership.
    #[instrument(skip(self, identity, input))]
    pub async fn update(
        &self,
        identity: Option<&Identity>,
        id: Uuid,
        input: ProductInput,
    ) -> ProductResult<ProductDetails> {
        let identity = authenticated(identity)?;
        let content = input
            .validate()
            .map_err(|errors| ProductError::Validation(errors.into_messages()))?;

        let existing = self.get(id).await?;
        let existing = self.populate_one(existing).await?;
        Ownership::of_details(&existing).require(identity)?;

        let updated = self
            .repository
            .update_content(id, content)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        tracing::info!(product_id = %id, "Product updated");
        Ok(updated.with_creator(existing.creator))
    }

    /// Remove the caller's product and detach it from their list.
    #[instrument(skip(self, identity))]
    pub async fn delete(&self, identity: Option<&Identity>, id: Uuid) -> ProductResult<()> {
        let identity = authenticated(identity)?;

        let product = self.get(id).await?;
        Ownership::of(&product).require(identity)?;

        if !self.repository.delete(id).await? {
            tracing::debug!(product_id = %id, "Product already gone");
        }

        if !self.owners.detach_product(product.creator, id).await? {
            tracing::warn!(product_id = %id, user_id = %product.creator, "Owner missing on delete");
        }

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    async fn populate_one(&self, product: Product) -> ProductResult<ProductDetails> {
        let creator = match self.owners.find_owner(product.creator).await? {
            Some(creator) => creator,
            None => missing_owner(product.creator),
        };
        Ok(product.with_creator(creator))
    }

    async fn populate(&self, products: Vec<Product>) -> ProductResult<Vec<ProductDetails>> {
        let mut ids: Vec<Uuid> = products.iter().map(|p| p.creator).collect();
        ids.sort_unstable();
        ids.dedup();

        let owners: HashMap<Uuid, Creator> = self
            .owners
            .find_owners(&ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(products
            .into_iter()
            .map(|product| {
                let creator = owners
                    .get(&product.creator)
                    .cloned()
                    .unwrap_or_else(|| missing_owner(product.creator));
                product.with_creator(creator)
            })
            .collect())
    }
}

/// Placeholder for a creator whose account no longer exists.
fn missing_owner(id: Uuid) -> Creator {
    tracing::warn!(user_id = %id, "Product creator not found");
    Creator {
        id,
        name: String::new(),
    }
}
