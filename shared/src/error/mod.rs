//! Error taxonomy shared by the server and its clients
//!
//! | Range | Category |
//! |-------|----------|
//! | 0xxx | General (validation, malformed requests, conflict) |
//! | 1xxx | Auth |
//! | 4xxx | Order / cart |
//! | 6xxx | Catalog |
//! | 9xxx | System |
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::insufficient_stock("Widget", 3);
//! assert_eq!(err.code, ErrorCode::InsufficientStock);
//! assert_eq!(ApiResponse::error(&err).code, 4002);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
