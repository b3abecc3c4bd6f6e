//! API 路由模块
//!
//! | Prefix | Module |
//! |--------|--------|
//! | /health | [`health`] |
//! | /api/v1/auth | [`auth`] |
//! | /api/v1/products | [`products`] (catalog + categories) |
//! | /api/v1/cart | [`cart`] |
//! | /api/v1/orders | [`orders`] |

pub mod auth;
pub mod cart;
mod extract;
pub mod health;
pub mod orders;
pub mod products;

use axum::Router;
use serde::Deserialize;

use crate::core::AppState;

pub use extract::{Json, Query};

/// Query-string pagination
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// All routes, still waiting for state
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router(state))
        .merge(products::router())
        .merge(cart::router())
        .merge(orders::router(state))
}
