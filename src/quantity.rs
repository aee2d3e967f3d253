//! Quantity input
//!
//! Validation of user-entered gram amounts before they reach an order.

use thiserror::Error;

/// Rejected gram input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    /// Nothing was entered.
    #[error("please enter a number of grams")]
    Empty,

    /// The input is not a whole number.
    #[error("{0:?} is not a valid number of grams")]
    NotANumber(String),

    /// Zero or negative amount.
    #[error("quantity must be positive, got {0}")]
    NotPositive(i64),

    /// Amount does not fit in a gram count.
    #[error("{0} grams is too large")]
    TooLarge(String),
}

/// Parse a positive whole number of grams.
///
/// # Errors
///
/// Returns a [`QuantityError`] describing why the input was rejected.
pub fn parse_grams(input: &str) -> Result<u32, QuantityError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(QuantityError::Empty);
    }

    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);

    if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(QuantityError::NotANumber(trimmed.to_string()));
    }

    let value = trimmed
        .parse::<i64>()
        .map_err(|_err| QuantityError::TooLarge(trimmed.to_string()))?;

    if value <= 0 {
        return Err(QuantityError::NotPositive(value));
    }

    u32::try_from(value).map_err(|_err| QuantityError::TooLarge(trimmed.to_string()))
}
