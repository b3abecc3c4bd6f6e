//! AppError and the response envelope

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error carried through handlers and services
///
/// `details` holds structured extras for the client, e.g. `available` on an
/// insufficient-stock error.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    /// `Not enough stock for {name}. Available: {n}` with `details.available = n`
    pub fn insufficient_stock(product_name: &str, available: i64) -> Self {
        Self::with_message(
            ErrorCode::InsufficientStock,
            format!("Not enough stock for {product_name}. Available: {available}"),
        )
        .with_detail("available", available)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ConfigError, msg)
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }
}

/// Response envelope: `{code, message, data?, details?}`
///
/// Every error uses it; successes only when there is nothing but a message
/// to return (e.g. "Cart cleared"). `code` is 0 on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse<()> {
    /// Message-only success
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success.code(),
            message: message.into(),
            data: None,
            details: None,
        }
    }

    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success.code()
    }
}

/// Result alias used across the server
pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();

        // System failures keep their detail in the log only
        let body = if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
            ApiResponse::error(&AppError::new(self.code))
        } else {
            ApiResponse::error(&self)
        };
        (status, axum::Json(body)).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let status = ErrorCode::try_from(self.code)
            .map(|code| code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_new_uses_default_message() {
        let err = AppError::new(ErrorCode::CartEmpty);
        assert_eq!(err.message, "Cart is empty");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_insufficient_stock_reports_available() {
        let err = AppError::insufficient_stock("Widget", 5);
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Not enough stock for Widget. Available: 5");
        assert_eq!(err.details.unwrap().get("available").unwrap(), 5);
    }

    #[test]
    fn test_system_error_response_hides_message() {
        let response = AppError::database("disk I/O error at page 42").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_business_error_status() {
        let response = AppError::with_message(ErrorCode::OrderNotFound, "Order not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_envelope() {
        let body = ApiResponse::error(&AppError::insufficient_stock("Widget", 2));
        assert_eq!(body.code, 4002);
        assert!(!body.is_success());
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["details"]["available"], 2);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_message_envelope() {
        let body = ApiResponse::message("Cart cleared");
        assert!(body.is_success());
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"code":0,"message":"Cart cleared"}"#);
    }
}
