//! HTTP handlers for Products API
//!
//! Every successful mutation is published on the `products` channel.

use axum::{
    Json, Router,
    extract::{FromRequestParts, Query, State},
    http::{StatusCode, request::Parts},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{CurrentUser, ErrorResponse, FieldMessage, JsonBody, UuidPath};
use realtime::Broadcaster;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    Creator, PRODUCTS_EVENT, PageQuery, Product, ProductDetails, ProductEvent, ProductInput,
    RawPrice,
};
use crate::service::ProductService;

pub const TAG: &str = "products";

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(schemas(
        Product,
        ProductDetails,
        Creator,
        ProductInput,
        RawPrice,
        ProductListResponse,
        ProductCreatedResponse,
        ProductResponse,
        ProductDetailsResponse,
        MessageResponse,
        ErrorResponse,
        FieldMessage
    )),
    tags((name = TAG, description = "Product catalog endpoints"))
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct ProductsState {
    pub service: ProductService,
    pub broadcaster: Broadcaster,
}

impl ProductsState {
    fn publish(&self, event: &ProductEvent) {
        self.broadcaster.publish(PRODUCTS_EVENT, event);
    }
}

/// Create the products router, meant to be nested under `/products`.
///
/// Mutations read the caller from the request extensions, put there by
/// `auth_context_middleware`.
pub fn router(service: ProductService, broadcaster: Broadcaster) -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(ProductsState {
            service,
            broadcaster,
        })
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub message: String,
    pub products: Vec<ProductDetails>,
    pub total_items: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductCreatedResponse {
    pub message: String,
    pub product: Product,
    pub creator: Creator,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub message: String,
    pub product: Product,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductDetailsResponse {
    pub message: String,
    pub product: ProductDetails,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// List products, two per page, newest first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(PageQuery),
    responses(
        (status = 200, description = "One page of products", body = ProductListResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
async fn list_products(
    State(state): State<ProductsState>,
    Query(query): Query<PageQuery>,
) -> ProductResult<Json<ProductListResponse>> {
    let page = state.service.list(query.page()).await?;
    Ok(Json(ProductListResponse {
        message: "Fetched products successfully.".to_string(),
        products: page.products,
        total_items: page.total_items,
    }))
}

/// Product id from the path; one that does not parse cannot exist.
///
/// Mutating handlers take [`CurrentUser`] first, so an anonymous caller gets
/// 401 before the id or body is looked at.
pub struct ProductId(pub Uuid);

impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = ProductError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        UuidPath::from_request_parts(parts, state)
            .await
            .map(|UuidPath(id)| ProductId(id))
            .map_err(|_| ProductError::NotFound(Uuid::nil()))
    }
}

/// Create a product owned by the caller
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    security(("bearer" = [])),
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = ProductCreatedResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
async fn create_product(
    State(state): State<ProductsState>,
    CurrentUser(identity): CurrentUser,
    JsonBody(input): JsonBody<ProductInput>,
) -> ProductResult<impl IntoResponse> {
    let created = state.service.create(Some(&identity), input).await?;
    state.publish(&ProductEvent::Create(created.details()));

    Ok((
        StatusCode::CREATED,
        Json(ProductCreatedResponse {
            message: "Product created successfully!".to_string(),
            product: created.product,
            creator: created.creator,
        }),
    ))
}

/// Fetch one product
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Could not find product", body = ErrorResponse)
    )
)]
async fn get_product(
    State(state): State<ProductsState>,
    ProductId(id): ProductId,
) -> ProductResult<Json<ProductResponse>> {
    let product = state.service.get(id).await?;
    Ok(Json(ProductResponse {
        message: "Product fetched.".to_string(),
        product,
    }))
}

/// Overwrite a product the caller created
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product updated", body = ProductDetailsResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not the creator", body = ErrorResponse),
        (status = 404, description = "Could not find product", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    )
)]
async fn update_product(
    State(state): State<ProductsState>,
    CurrentUser(identity): CurrentUser,
    ProductId(id): ProductId,
    JsonBody(input): JsonBody<ProductInput>,
) -> ProductResult<Json<ProductDetailsResponse>> {
    let product = state.service.update(Some(&identity), id, input).await?;
    state.publish(&ProductEvent::Update(product.clone()));

    Ok(Json(ProductDetailsResponse {
        message: "Product updated!".to_string(),
        product,
    }))
}

/// Delete a product the caller created
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not the creator", body = ErrorResponse),
        (status = 404, description = "Could not find product", body = ErrorResponse)
    )
)]
async fn delete_product(
    State(state): State<ProductsState>,
    CurrentUser(identity): CurrentUser,
    ProductId(id): ProductId,
) -> ProductResult<Json<MessageResponse>> {
    state.service.delete(Some(&identity), id).await?;
    state.publish(&ProductEvent::Delete(id));

    Ok(Json(MessageResponse {
        message: "Deleted product.".to_string(),
    }))
}
