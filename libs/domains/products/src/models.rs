use axum_helpers::InputErrors;
use chrono::{DateTime, Utc};
use database::serde_helpers::rfc3339_millis;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Minimum length of title and description.
pub const MIN_TEXT_LEN: u64 = 5;

/// Products per listing page.
pub const PAGE_SIZE: u64 = 2;

/// Event name under which product changes are broadcast.
pub const PRODUCTS_EVENT: &str = "products";

/// Non-negative, finite product price.
///
/// Stored as a BSON double, exchanged with clients as a string. Accepts a
/// string or a number on input.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value >= 0.0).then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawPrice::deserialize(deserializer)?;
        raw.parse()
            .ok_or_else(|| de::Error::custom(format!("invalid price: {raw}")))
    }
}

/// Price as submitted by a client, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

impl RawPrice {
    pub fn parse(&self) -> Option<Price> {
        match self {
            Self::Number(value) => Price::new(*value),
            Self::Text(text) => text.trim().parse::<f64>().ok().and_then(Price::new),
        }
    }
}

impl fmt::Display for RawPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Stored product document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[schema(value_type = String, example = "9.99")]
    pub price: Price,
    /// Owning user; never changes after creation
    pub creator: Uuid,
    #[serde(with = "rfc3339_millis")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "rfc3339_millis")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(creator: Uuid, content: ProductContent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: content.title,
            description: content.description,
            price: content.price,
            creator,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_creator(self, creator: Creator) -> ProductDetails {
        ProductDetails {
            id: self.id,
            title: self.title,
            description: self.description,
            price: self.price,
            creator,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Display form of a product's owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Creator {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
}

/// Product with its creator populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[schema(value_type = String, example = "9.99")]
    pub price: Price,
    pub creator: Creator,
    #[serde(with = "rfc3339_millis")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "rfc3339_millis")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

impl ProductDetails {
    /// Drop the populated creator back to its id.
    pub fn into_product(self) -> Product {
        Product {
            id: self.id,
            title: self.title,
            description: self.description,
            price: self.price,
            creator: self.creator.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Client input for create and update.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProductInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Option<RawPrice>,
}

/// Validated product fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductContent {
    pub title: String,
    pub description: String,
    pub price: Price,
}

impl ProductInput {
    /// Title, then description, then price; every failure is reported.
    pub fn validate(self) -> Result<ProductContent, InputErrors> {
        let title = self.title.trim().to_string();
        let description = self.description.trim().to_string();
        let price = self.price.as_ref().and_then(RawPrice::parse);

        let mut errors = InputErrors::new();
        errors
            .min_length(&title, MIN_TEXT_LEN, "Title is invalid.")
            .min_length(&description, MIN_TEXT_LEN, "Description is invalid.")
            .check(price.is_some(), "Price is invalid.");

        match price {
            Some(price) if errors.is_empty() => Ok(ProductContent {
                title,
                description,
                price,
            }),
            _ => Err(errors),
        }
    }
}

/// `?page=N`; anything missing, unparsable or below 1 means page 1.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
    }
}

/// One listing page plus the total for client-side pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<ProductDetails>,
    pub total_items: u64,
}

/// Change event published on the `products` channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "product", rename_all = "lowercase")]
pub enum ProductEvent {
    Create(ProductDetails),
    Update(ProductDetails),
    Delete(Uuid),
}
