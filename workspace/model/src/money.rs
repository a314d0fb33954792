//! Conversion between API decimals and the integer minor units stored in the database.
//!
//! Balances, limits and amounts are persisted as hundredths in a `BIGINT`
//! column so that `balance = balance + delta` stays exact on every backend.

use crate::constraints::DECIMAL_PLACES;
use rust_decimal::Decimal;

/// Converts a decimal into minor units.
///
/// Returns `None` when the value carries more than [`DECIMAL_PLACES`]
/// significant fractional digits or does not fit into an `i64`.
pub fn to_minor(value: Decimal) -> Option<i64> {
    let mut scaled = value;
    scaled.rescale(DECIMAL_PLACES);
    if scaled != value {
        return None;
    }
    i64::try_from(scaled.mantissa()).ok()
}

/// Converts minor units back into a decimal with exactly two fractional digits.
pub fn from_minor(minor: i64) -> Decimal {
    Decimal::new(minor, DECIMAL_PLACES)
}
