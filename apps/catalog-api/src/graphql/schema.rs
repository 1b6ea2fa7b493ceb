//! GraphQL types and resolvers.
//!
//! Resolvers call the same domain services as the REST handlers. They do not
//! publish change events.

use async_graphql::{
    Context, EmptySubscription, ID, InputObject, Object, Result, Schema, SimpleObject,
};
use axum_helpers::{AppError, Identity};
use chrono::{DateTime, SecondsFormat, Utc};
use domain_products::{
    Creator, Product, ProductDetails, ProductError, ProductInput, ProductService, RawPrice,
};
use domain_users::{CreateUser, LoginRequest, UserResponse, UserService};
use uuid::Uuid;

use super::error::{GraphqlResultExt, graphql_error};

pub type CatalogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn identity<'a>(ctx: &Context<'a>) -> Result<&'a Identity> {
    ctx.data_opt::<Identity>()
        .ok_or_else(|| graphql_error(AppError::unauthenticated()))
}

/// Unparsable ids cannot exist, so they are reported as missing.
fn product_id(id: &ID) -> Result<Uuid> {
    id.parse::<Uuid>()
        .map_err(|_| graphql_error(ProductError::NotFound(Uuid::nil())))
}

pub struct ProductObject {
    product: Product,
    creator: Option<Creator>,
}

impl ProductObject {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            creator: None,
        }
    }

    /// Keeps the creator the service already populated.
    pub fn with_creator(product: Product, creator: Creator) -> Self {
        Self {
            product,
            creator: Some(creator),
        }
    }
}

impl From<ProductDetails> for ProductObject {
    fn from(details: ProductDetails) -> Self {
        let creator = details.creator.clone();
        Self::with_creator(details.into_product(), creator)
    }
}

/// `User` fields that a populated [`Creator`] cannot answer.
const FULL_USER_FIELDS: [&str; 3] = ["email", "status", "products"];

#[Object(name = "Product")]
impl ProductObject {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        ID(self.product.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.product.title
    }

    async fn description(&self) -> &str {
        &self.product.description
    }

    async fn price(&self) -> String {
        self.product.price.to_string()
    }

    /// Served from the populated creator unless the selection needs the
    /// whole user document.
    async fn creator(&self, ctx: &Context<'_>) -> Result<UserObject> {
        if let Some(creator) = &self.creator {
            let selection = ctx.look_ahead();
            if !FULL_USER_FIELDS
                .iter()
                .any(|field| selection.field(field).exists())
            {
                return Ok(UserObject::Creator(creator.clone()));
            }
        }

        let users = ctx.data::<UserService>()?;
        let user = users.get_user(self.product.creator).await.gql()?;
        Ok(UserObject::Full(user))
    }

    async fn created_at(&self) -> String {
        timestamp(&self.product.created_at)
    }

    async fn updated_at(&self) -> String {
        timestamp(&self.product.updated_at)
    }
}

/// A user, either loaded in full or as the `{_id, name}` pair populated on
/// a product.
pub enum UserObject {
    Full(UserResponse),
    Creator(Creator),
}

impl UserObject {
    async fn load(&self, ctx: &Context<'_>) -> Result<UserResponse> {
        match self {
            Self::Full(user) => Ok(user.clone()),
            Self::Creator(creator) => {
                let users = ctx.data::<UserService>()?;
                users.get_user(creator.id).await.gql()
            }
        }
    }
}

#[Object(name = "User")]
impl UserObject {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        let id = match self {
            Self::Full(user) => user.id,
            Self::Creator(creator) => creator.id,
        };
        ID(id.to_string())
    }

    async fn name(&self) -> &str {
        match self {
            Self::Full(user) => &user.name,
            Self::Creator(creator) => &creator.name,
        }
    }

    async fn email(&self, ctx: &Context<'_>) -> Result<String> {
        Ok(self.load(ctx).await?.email)
    }

    /// Always null
    async fn password(&self) -> Option<String> {
        None
    }

    async fn status(&self, ctx: &Context<'_>) -> Result<String> {
        Ok(self.load(ctx).await?.status)
    }

    async fn products(&self, ctx: &Context<'_>) -> Result<Vec<ProductObject>> {
        let user = self.load(ctx).await?;
        let products = ctx.data::<ProductService>()?;
        let found = products.get_many(&user.products).await.gql()?;
        let creator = Creator {
            id: user.id,
            name: user.name,
        };
        Ok(found
            .into_iter()
            .map(|product| ProductObject::with_creator(product, creator.clone()))
            .collect())
    }
}

#[derive(SimpleObject)]
pub struct AuthData {
    pub token: String,
    pub user_id: String,
}

#[derive(SimpleObject)]
pub struct ProductData {
    pub products: Vec<ProductObject>,
    pub total_products: i32,
}

#[derive(InputObject, Default)]
pub struct UserInputData {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(InputObject)]
pub struct ProductInputData {
    pub title: String,
    pub description: String,
    pub price: String,
}

impl From<UserInputData> for CreateUser {
    fn from(input: UserInputData) -> Self {
        Self {
            email: input.email,
            name: input.name,
            password: input.password,
        }
    }
}

/// Absent input validates as empty input.
fn product_input_from(input: Option<ProductInputData>) -> ProductInput {
    input.map(ProductInput::from).unwrap_or_default()
}

impl From<ProductInputData> for ProductInput {
    fn from(input: ProductInputData) -> Self {
        Self {
            title: input.title,
            description: input.description,
            price: Some(RawPrice::Text(input.price)),
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthData> {
        let users = ctx.data::<UserService>()?;
        let auth = users
            .login(LoginRequest { email, password })
            .await
            .gql()?;

        Ok(AuthData {
            token: auth.token,
            user_id: auth.user_id,
        })
    }

    async fn products(&self, ctx: &Context<'_>, page: Option<i32>) -> Result<ProductData> {
        identity(ctx)?;
        let products = ctx.data::<ProductService>()?;
        let page = products.list(page.map_or(1, i64::from)).await.gql()?;

        Ok(ProductData {
            products: page.products.into_iter().map(ProductObject::from).collect(),
            total_products: i32::try_from(page.total_items).unwrap_or(i32::MAX),
        })
    }

    async fn product(&self, ctx: &Context<'_>, id: ID) -> Result<ProductObject> {
        identity(ctx)?;
        let products = ctx.data::<ProductService>()?;
        let product = products.get(product_id(&id)?).await.gql()?;
        Ok(ProductObject::new(product))
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<UserObject> {
        let identity = identity(ctx)?;
        let users = ctx.data::<UserService>()?;
        let user = users.get_user(identity.user_id).await.gql()?;
        Ok(UserObject::Full(user))
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        user_input: Option<UserInputData>,
    ) -> Result<UserObject> {
        let users = ctx.data::<UserService>()?;
        let user = users
            .create_user(user_input.unwrap_or_default().into())
            .await
            .gql()?;
        Ok(UserObject::Full(user))
    }

    async fn create_product(
        &self,
        ctx: &Context<'_>,
        product_input: Option<ProductInputData>,
    ) -> Result<ProductObject> {
        let products = ctx.data::<ProductService>()?;
        let created = products
            .create(ctx.data_opt::<Identity>(), product_input_from(product_input))
            .await
            .gql()?;
        Ok(ProductObject::with_creator(created.product, created.creator))
    }

    async fn update_product(
        &self,
        ctx: &Context<'_>,
        id: ID,
        product_input: Option<ProductInputData>,
    ) -> Result<ProductObject> {
        let products = ctx.data::<ProductService>()?;
        let identity = ctx.data_opt::<Identity>();
        // Authentication is reported before a malformed id
        if identity.is_none() {
            return Err(graphql_error(ProductError::Unauthenticated));
        }

        let updated = products
            .update(identity, product_id(&id)?, product_input_from(product_input))
            .await
            .gql()?;
        Ok(ProductObject::from(updated))
    }

    async fn delete_product(&self, ctx: &Context<'_>, id: ID) -> Result<Option<bool>> {
        let products = ctx.data::<ProductService>()?;
        let identity = identity(ctx)?;
        products
            .delete(Some(identity), product_id(&id)?)
            .await
            .gql()?;
        Ok(Some(true))
    }

    async fn update_status(&self, ctx: &Context<'_>, status: String) -> Result<UserObject> {
        let identity = identity(ctx)?;
        let users = ctx.data::<UserService>()?;
        let user = users
            .update_status(identity.user_id, &status)
            .await
            .gql()?;
        Ok(UserObject::Full(user))
    }
}
