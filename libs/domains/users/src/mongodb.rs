//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, doc, to_bson},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

const DUPLICATE_KEY: i32 = 11000;

/// MongoDB implementation of the UserRepository
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<User>("users"),
        }
    }

    /// Unique email index backing the duplicate check
    pub async fn init_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("idx_email_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }
}

fn id_filter(id: Uuid) -> mongodb::bson::Document {
    doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn insert(&self, user: User) -> UserResult<User> {
        match self.collection.insert_one(&user).await {
            Ok(_) => {
                tracing::info!("User created successfully");
                Ok(user)
            }
            Err(e) if is_duplicate_key(&e) => Err(UserError::DuplicateEmail(user.email)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[Uuid]) -> UserResult<Vec<User>> {
        let ids = ids
            .iter()
            .map(|id| to_bson(id).unwrap_or(Bson::Null))
            .collect::<Vec<_>>();

        let cursor = self.collection.find(doc! { "_id": { "$in": ids } }).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, status))]
    async fn update_status(&self, id: Uuid, status: &str) -> UserResult<Option<User>> {
        let update = doc! {
            "$set": {
                "status": status,
                "updatedAt": now(),
            }
        };

        let user = self
            .collection
            .find_one_and_update(id_filter(id), update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn push_product(&self, user_id: Uuid, product_id: Uuid) -> UserResult<bool> {
        let update = doc! {
            "$push": { "products": to_bson(&product_id).unwrap_or(Bson::Null) },
            "$set": { "updatedAt": now() },
        };
        let result = self.collection.update_one(id_filter(user_id), update).await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn pull_product(&self, user_id: Uuid, product_id: Uuid) -> UserResult<bool> {
        let update = doc! {
            "$pull": { "products": to_bson(&product_id).unwrap_or(Bson::Null) },
            "$set": { "updatedAt": now() },
        };
        let result = self.collection.update_one(id_filter(user_id), update).await?;
        Ok(result.matched_count > 0)
    }
}

/// Same format as the serialized `updatedAt` field.
fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
