//! Product Model

use super::category::Category;
use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub sku: String,
    /// Never negative; only the order transaction and admin updates change it
    pub stock_quantity: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub weight: Option<f64>,
    pub dimensions: Option<String>,
    pub created_at: i64,
    pub updated_at: Option<i64>,

    // -- Relations (populated by application code, skipped by FromRow) --
    /// Linked active categories (junction table)
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub sku: String,
    #[serde(default)]
    pub stock_quantity: i64,
    pub image_url: Option<String>,
    pub weight: Option<f64>,
    pub dimensions: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

/// Update product payload
///
/// `category_ids`, when present, replaces the whole association set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock_quantity: Option<i64>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub weight: Option<f64>,
    pub dimensions: Option<String>,
    pub category_ids: Option<Vec<i64>>,
}

/// Catalog search filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Case-insensitive substring match on name or description
    pub search: Option<String>,
    pub category_id: Option<i64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// `true` = stock > 0, `false` = stock = 0
    pub in_stock: Option<bool>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}
