//! Catalog rows: categories, products, product images.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stellar_market_core::{AccountId, CategoryId, ProductId};

/// A taxonomy node in the `categories` table.
///
/// Hierarchy is one level deep: a category either has no parent or its
/// parent is a top-level category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Unique, URL-safe identifier.
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
}

/// Insert payload for `categories`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
}

/// A row in the `products` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub category: CategoryId,
    pub seller_id: AccountId,
    pub stock: u32,
    /// Unique, URL-safe identifier.
    pub slug: String,
    pub featured: bool,
    /// Server-maintained aggregate; absent until the first rating lands.
    #[serde(default)]
    pub rating: Option<Decimal>,
    #[serde(default)]
    pub rating_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for `products`.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub category: CategoryId,
    pub seller_id: AccountId,
    pub stock: u32,
    pub slug: String,
    pub featured: bool,
}

/// Insert payload for `product_images`.
///
/// `display_order` defines the presentation sequence; by convention the
/// first image of a product (order 0) is the primary one.
#[derive(Debug, Clone, Serialize)]
pub struct NewProductImage {
    pub product_id: ProductId,
    pub url: String,
    pub alt_text: String,
    pub display_order: u32,
    pub is_primary: bool,
}
