//! Money calculation utilities using rust_decimal for precision
//!
//! Prices are stored and serialized as `f64`; every sum is computed as
//! `Decimal` and rounded to 2 places before going back to `f64`.

use rust_decimal::prelude::*;
use shared::error::{AppError, ErrorCode};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price (1,000,000)
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i64 = 9999;

/// Convert f64 to Decimal; non-finite values become zero
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Round a price to currency precision
pub fn round_money(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// `price × quantity` as Decimal
pub fn line_total(price: f64, quantity: i64) -> Decimal {
    to_decimal(price) * Decimal::from(quantity)
}

/// Sum of `price × quantity` over `(price, quantity)` pairs, rounded to 2 places
pub fn sum_lines<I>(lines: I) -> f64
where
    I: IntoIterator<Item = (f64, i64)>,
{
    to_f64(lines.into_iter().map(|(p, q)| line_total(p, q)).sum())
}

/// Price must be finite, positive and below [`MAX_PRICE`]
pub fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("Price must be positive, got {}", price),
        ));
    }
    if price > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("Price exceeds maximum allowed ({}), got {}", MAX_PRICE, price),
        ));
    }
    Ok(())
}

/// Validate, round to currency precision, then check the rounded price is still positive
pub fn normalize_price(price: f64) -> Result<f64, AppError> {
    validate_price(price)?;
    let rounded = round_money(price);
    if rounded <= 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("Price rounds to zero, got {}", price),
        ));
    }
    Ok(rounded)
}

/// Quantity must be in `1..=MAX_QUANTITY`
pub fn validate_quantity(quantity: i64) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!("Quantity must be positive, got {}", quantity),
        ));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!(
                "Quantity exceeds maximum allowed ({}), got {}",
                MAX_QUANTITY, quantity
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_lines_has_no_float_drift() {
        // 0.1 * 3 + 0.2 in plain f64 is 0.5000000000000001
        assert_eq!(sum_lines([(0.1, 3), (0.2, 1)]), 0.5);
        assert_eq!(sum_lines([(19.99, 3)]), 59.97);
    }

    #[test]
    fn test_sum_lines_empty() {
        assert_eq!(sum_lines(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(2.125), 2.13);
        assert_eq!(round_money(2.344), 2.34);
        assert_eq!(round_money(10.0), 10.0);
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(9.99).is_ok());
        assert_eq!(validate_price(0.0).unwrap_err().code, ErrorCode::InvalidPrice);
        assert_eq!(validate_price(-1.0).unwrap_err().code, ErrorCode::InvalidPrice);
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(MAX_PRICE + 1.0).is_err());
    }

    #[test]
    fn test_normalize_price_rejects_sub_cent() {
        assert_eq!(normalize_price(0.004).unwrap_err().code, ErrorCode::InvalidPrice);
        assert_eq!(normalize_price(0.005).unwrap(), 0.01);
        assert_eq!(normalize_price(19.994).unwrap(), 19.99);
        assert!(normalize_price(-0.004).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert_eq!(
            validate_quantity(0).unwrap_err().code,
            ErrorCode::InvalidQuantity
        );
        assert!(validate_quantity(MAX_QUANTITY + 1).is_err());
    }
}
