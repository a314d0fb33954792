//! Field rules for names, money values and budget periods.
//!
//! Money checks return the value converted to minor units, which is what the
//! entities store.

use crate::{LedgerError, Result};
use model::constraints::{
    DECIMAL_PLACES, MAX_DECIMAL_DIGITS, MAX_NAME_LENGTH, MAX_USERNAME_LENGTH, MIN_DECIMAL_VALUE,
};
use model::money::to_minor;
use rust_decimal::Decimal;

/// Checks digit counts the same way a `DECIMAL(14, 2)` column would.
pub fn check_precision(field: &'static str, value: Decimal) -> Result<i64> {
    let normalized = value.normalize();
    let digits = normalized
        .mantissa()
        .unsigned_abs()
        .checked_ilog10()
        .map_or(1, |log| log + 1);
    let decimals = normalized.scale();
    let whole_digits = digits.saturating_sub(decimals);

    if whole_digits + decimals > MAX_DECIMAL_DIGITS {
        return Err(LedgerError::validation(
            field,
            format!("Ensure that there are no more than {MAX_DECIMAL_DIGITS} digits in total."),
        ));
    }
    if decimals > DECIMAL_PLACES {
        return Err(LedgerError::validation(
            field,
            format!("Ensure that there are no more than {DECIMAL_PLACES} decimal places."),
        ));
    }
    if whole_digits > MAX_DECIMAL_DIGITS - DECIMAL_PLACES {
        return Err(LedgerError::validation(
            field,
            format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                MAX_DECIMAL_DIGITS - DECIMAL_PLACES
            ),
        ));
    }

    to_minor(normalized).ok_or_else(|| LedgerError::validation(field, "A valid number is required."))
}

/// A signed balance. Overdrafts are allowed.
pub fn check_balance(field: &'static str, value: Decimal) -> Result<i64> {
    check_precision(field, value)
}

/// A strictly positive amount or limit, at least 0.01.
pub fn check_amount(field: &'static str, value: Decimal) -> Result<i64> {
    if value < MIN_DECIMAL_VALUE {
        return Err(LedgerError::validation(
            field,
            format!("Ensure this value is greater than or equal to {MIN_DECIMAL_VALUE}."),
        ));
    }
    check_precision(field, value)
}

pub fn check_period(field: &'static str, months: i16) -> Result<()> {
    if months < 1 {
        return Err(LedgerError::validation(
            field,
            "Ensure this value is greater than or equal to 1.",
        ));
    }
    Ok(())
}

/// Trims surrounding whitespace and enforces the name length limit.
pub fn normalize_name(field: &'static str, value: &str) -> Result<String> {
    normalize_text(field, value, MAX_NAME_LENGTH)
}

pub fn normalize_username(value: &str) -> Result<String> {
    normalize_text("username", value, MAX_USERNAME_LENGTH)
}

fn normalize_text(field: &'static str, value: &str, max_length: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation(field, "This field may not be blank."));
    }
    if trimmed.chars().count() > max_length {
        return Err(LedgerError::validation(
            field,
            format!("Ensure this field has no more than {max_length} characters."),
        ));
    }
    Ok(trimmed.to_string())
}
