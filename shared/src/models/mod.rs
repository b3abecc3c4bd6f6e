//! Data models
//!
//! Shared between the server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod admin;
pub mod cart;
pub mod category;
pub mod order;
pub mod product;

// Re-exports
pub use admin::*;
pub use cart::*;
pub use category::*;
pub use order::*;
pub use product::*;
