//! Synthetic entity models and their generation options

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::faker::Address;

/// Registry label for users
pub const USERS: &str = "users";
/// Registry label for products
pub const PRODUCTS: &str = "products";
/// Registry label for orders
pub const ORDERS: &str = "orders";
/// Registry label for API request fixtures
pub const API_DATA: &str = "apiData";

/// A generated user.
///
/// `plain_password` is kept on purpose so test flows can type it into a
/// login form; it is not a security boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    /// Encrypted blob when generated with `encrypt_password`, otherwise plaintext
    pub password: String,
    pub plain_password: String,
    pub password_encrypted: bool,
    pub role: String,
    pub phone: String,
    pub address: Address,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserOptions {
    pub role: String,
    pub domain: String,
    /// Explicit password instead of a generated one
    pub password: Option<String>,
    pub password_length: usize,
    /// Route the password through the cipher; `None` uses the manager default
    pub encrypt_password: Option<bool>,
    pub is_active: bool,
}

impl Default for UserOptions {
    fn default() -> Self {
        Self {
            role: "user".to_string(),
            domain: "example.test".to_string(),
            password: None,
            password_length: 12,
            encrypt_password: None,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub sku: String,
    pub price: f64,
    pub stock: u32,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductOptions {
    pub category: Option<String>,
    pub min_price: f64,
    pub max_price: f64,
    pub in_stock: bool,
}

impl Default for ProductOptions {
    fn default() -> Self {
        Self {
            category: None,
            min_price: 1.0,
            max_price: 500.0,
            in_stock: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub shipping_address: Address,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderOptions {
    /// Owner of the order; a fresh id when absent
    pub user_id: Option<Uuid>,
    pub item_count: usize,
    pub max_quantity: u32,
    pub status: OrderStatus,
    pub product: ProductOptions,
}

impl Default for OrderOptions {
    fn default() -> Self {
        Self {
            user_id: None,
            item_count: 2,
            max_quantity: 3,
            status: OrderStatus::Pending,
            product: ProductOptions::default(),
        }
    }
}

/// A request fixture for exercising an HTTP endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiData {
    pub id: Uuid,
    pub endpoint: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiDataOptions {
    pub method: String,
    /// Add a bearer secure token to the headers
    pub authenticated: bool,
    pub token_ttl_minutes: i64,
    /// Fields merged over the generated body
    pub overrides: serde_json::Map<String, serde_json::Value>,
}

impl Default for ApiDataOptions {
    fn default() -> Self {
        Self {
            method: "POST".to_string(),
            authenticated: false,
            token_ttl_minutes: fixturekit_common::token::DEFAULT_TTL_MINUTES,
            overrides: serde_json::Map::new(),
        }
    }
}

/// Any entity held in the manager's registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratedEntity {
    User(User),
    Product(Product),
    Order(Order),
    Api(ApiData),
}

impl GeneratedEntity {
    /// Registry label for this entity's type
    pub fn kind(&self) -> &'static str {
        match self {
            GeneratedEntity::User(_) => USERS,
            GeneratedEntity::Product(_) => PRODUCTS,
            GeneratedEntity::Order(_) => ORDERS,
            GeneratedEntity::Api(_) => API_DATA,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            GeneratedEntity::User(u) => u.id,
            GeneratedEntity::Product(p) => p.id,
            GeneratedEntity::Order(o) => o.id,
            GeneratedEntity::Api(a) => a.id,
        }
    }
}

impl From<User> for GeneratedEntity {
    fn from(user: User) -> Self {
        GeneratedEntity::User(user)
    }
}

impl From<Product> for GeneratedEntity {
    fn from(product: Product) -> Self {
        GeneratedEntity::Product(product)
    }
}

impl From<Order> for GeneratedEntity {
    fn from(order: Order) -> Self {
        GeneratedEntity::Order(order)
    }
}

impl From<ApiData> for GeneratedEntity {
    fn from(api: ApiData) -> Self {
        GeneratedEntity::Api(api)
    }
}
