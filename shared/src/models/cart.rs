//! Guest Cart Model

use super::product::Product;
use serde::{Deserialize, Serialize};

/// Cart line keyed by an opaque guest session id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: i64,
    pub session_id: String,
    pub product_id: i64,
    pub quantity: i64,
    pub created_at: i64,
    pub updated_at: Option<i64>,

    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

/// Add-to-cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemCreate {
    pub session_id: String,
    pub product_id: i64,
    pub quantity: i64,
}

/// Cart quantity update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemUpdate {
    pub quantity: i64,
}

/// Cart totals at current catalog prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartTotal {
    pub total_amount: f64,
    /// Sum of quantities
    pub item_count: i64,
    /// Number of distinct lines
    pub items: i64,
}
