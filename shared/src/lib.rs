//! Shared types for the shop backend
//!
//! Error codes, the unified API response envelope and the domain models used
//! by the server and its HTTP clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
