//! Orders
//!
//! - [`money`] - Decimal-backed price arithmetic
//! - [`number`] - order number generation
//! - [`service`] - order placement transaction and admin updates

pub mod money;
pub mod number;
pub mod service;

pub use service::OrderService;
