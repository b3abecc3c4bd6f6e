//! Input validation helpers
//!
//! Text length limits shared by the catalog, cart and order handlers.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;

/// Entity names: product, category, customer
pub const MAX_NAME_LEN: usize = 200;

/// Notes and descriptions
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: phone, sku, session id
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Image URLs
pub const MAX_URL_LEN: usize = 2048;

/// Non-blank and at most `max_len` characters
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    check_len(value, field, max_len)
}

/// `None` passes; `Some` must fit in `max_len` characters
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => check_len(v, field, max_len),
        None => Ok(()),
    }
}

// Counts chars, not bytes: names and addresses are often non-ASCII
fn check_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} must be at most {max_len} characters (got {len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Ana", "customer_name", MAX_NAME_LEN).is_ok());
        let err = validate_required_text("   ", "customer_name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("customer_name"));
        assert!(validate_required_text(&"x".repeat(101), "phone", MAX_SHORT_TEXT_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "notes", 5).is_ok());
        assert!(validate_optional_text(&Some("abc".into()), "notes", 5).is_ok());
        assert!(validate_optional_text(&Some("abcdef".into()), "notes", 5).is_err());
    }

    #[test]
    fn test_length_counts_characters() {
        // 5 chars, 7 bytes
        assert!(validate_required_text("ñandú", "name", 5).is_ok());
        let err = validate_required_text("ñandús", "name", 5).unwrap_err();
        assert_eq!(err.details.unwrap().get("field").unwrap(), "name");
    }
}
