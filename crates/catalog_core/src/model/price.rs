//! Exact-decimal price handling.
//!
//! # Responsibility
//! - Parse caller-provided prices (decimal values or their string form).
//! - Enforce the `NUMERIC(14,2)` storage envelope.
//! - Produce the canonical two-digit text used for storage and transport.
//!
//! # Invariants
//! - Prices never pass through binary floating point.
//! - Canonical text always carries exactly `PRICE_SCALE` fractional digits,
//!   so `12.5` and `12.50` share one representation.

use crate::model::product::DataValidationError;
use rust_decimal::Decimal;

/// Fractional digits kept by storage and by the serialized form.
pub const PRICE_SCALE: u32 = 2;

/// Exclusive upper bound on the absolute price (12 integer digits).
const PRICE_LIMIT: i64 = 1_000_000_000_000;

/// Conversion into a validated price.
///
/// Lets finders accept either a `Decimal` or its string representation;
/// both forms normalize to the same value before comparison.
pub trait IntoPrice {
    fn into_price(self) -> Result<Decimal, DataValidationError>;
}

impl IntoPrice for Decimal {
    fn into_price(self) -> Result<Decimal, DataValidationError> {
        check_price(self)
    }
}

impl IntoPrice for &Decimal {
    fn into_price(self) -> Result<Decimal, DataValidationError> {
        check_price(*self)
    }
}

impl IntoPrice for &str {
    fn into_price(self) -> Result<Decimal, DataValidationError> {
        parse_price(self)
    }
}

impl IntoPrice for String {
    fn into_price(self) -> Result<Decimal, DataValidationError> {
        parse_price(&self)
    }
}

impl IntoPrice for &String {
    fn into_price(self) -> Result<Decimal, DataValidationError> {
        parse_price(self)
    }
}

/// Parses a price from its decimal string form.
///
/// Surrounding whitespace is ignored. Parsing is exact: inputs that would
/// lose precision are rejected rather than rounded.
///
/// # Errors
/// - `InvalidPrice` when `raw` is not a decimal literal.
/// - `PriceOutOfRange` when the value does not fit `NUMERIC(14,2)`.
pub fn parse_price(raw: &str) -> Result<Decimal, DataValidationError> {
    let value = Decimal::from_str_exact(raw.trim())
        .map_err(|_| DataValidationError::InvalidPrice(raw.to_string()))?;
    check_price(value)
}

/// Checks that `price` fits the storage envelope.
///
/// Trailing zeros do not count against the scale: `12.500` is accepted,
/// `12.505` is not.
pub fn check_price(price: Decimal) -> Result<Decimal, DataValidationError> {
    let normalized = price.normalize();
    if normalized.scale() > PRICE_SCALE || normalized.abs() >= Decimal::new(PRICE_LIMIT, 0) {
        return Err(DataValidationError::PriceOutOfRange(price));
    }
    Ok(price)
}

/// Returns the canonical text for `price`, e.g. `12.50`.
pub fn price_text(price: Decimal) -> String {
    let mut canonical = price.normalize();
    canonical.rescale(PRICE_SCALE);
    canonical.to_string()
}

#[cfg(test)]
mod tests {
    use super::{check_price, parse_price, price_text, IntoPrice};
    use crate::model::product::DataValidationError;
    use rust_decimal::Decimal;

    #[test]
    fn parse_price_accepts_trimmed_decimal_text() {
        assert_eq!(parse_price(" 19.99 ").unwrap(), Decimal::new(1999, 2));
        assert_eq!(parse_price("7").unwrap(), Decimal::new(7, 0));
    }

    #[test]
    fn parse_price_rejects_non_decimal_text() {
        let err = parse_price("twelve").unwrap_err();
        assert_eq!(err, DataValidationError::InvalidPrice("twelve".to_string()));
        assert!(parse_price("").is_err());
    }

    #[test]
    fn check_price_enforces_scale_and_magnitude() {
        assert!(check_price(Decimal::new(12500, 3)).is_ok());
        assert!(matches!(
            check_price(Decimal::new(12505, 3)),
            Err(DataValidationError::PriceOutOfRange(_))
        ));
        assert!(check_price(Decimal::new(999_999_999_999, 0)).is_ok());
        assert!(check_price(Decimal::new(1_000_000_000_000, 0)).is_err());
    }

    #[test]
    fn price_text_always_has_two_fraction_digits() {
        assert_eq!(price_text(Decimal::new(125, 1)), "12.50");
        assert_eq!(price_text(Decimal::new(12500, 3)), "12.50");
        assert_eq!(price_text(Decimal::new(3, 0)), "3.00");
    }

    #[test]
    fn string_and_decimal_forms_normalize_identically() {
        let from_text = "12.50".into_price().unwrap();
        let from_value = Decimal::new(125, 1).into_price().unwrap();
        assert_eq!(from_text, from_value);
        assert_eq!(price_text(from_text), price_text(from_value));
    }
}
