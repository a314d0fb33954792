//! Column constraints shared by the schema and by input validation.

use rust_decimal::Decimal;

/// Fractional digits kept for every money column.
pub const DECIMAL_PLACES: u32 = 2;

/// Total significant digits allowed for a money value, fractional part included.
pub const MAX_DECIMAL_DIGITS: u32 = 14;

/// Smallest accepted amount or budget limit (0.01).
pub const MIN_DECIMAL_VALUE: Decimal = Decimal::from_parts(1, 0, 0, false, DECIMAL_PLACES);

pub const MAX_NAME_LENGTH: usize = 32;

pub const MAX_USERNAME_LENGTH: usize = 150;

/// Largest stored balance, in hundredths, that still fits the money column.
pub const MAX_BALANCE_MINOR: i64 = 99_999_999_999_999;
