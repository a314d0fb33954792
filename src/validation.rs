//! `validator` rules for request bodies, backed by the ledger's field checks.

use ledger::LedgerError;
use rust_decimal::Decimal;
use std::borrow::Cow;
use validator::ValidationError;

fn to_validation_error(err: LedgerError) -> ValidationError {
    match err {
        LedgerError::Validation { field, message } => {
            ValidationError::new(field).with_message(Cow::Owned(message))
        }
        other => ValidationError::new("invalid").with_message(Cow::Owned(other.to_string())),
    }
}

pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    ledger::validation::check_amount("amount", *value)
        .map(|_| ())
        .map_err(to_validation_error)
}

pub fn validate_limit(value: &Decimal) -> Result<(), ValidationError> {
    ledger::validation::check_amount("limit", *value)
        .map(|_| ())
        .map_err(to_validation_error)
}

pub fn validate_balance(value: &Decimal) -> Result<(), ValidationError> {
    ledger::validation::check_balance("balance", *value)
        .map(|_| ())
        .map_err(to_validation_error)
}

pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    ledger::validation::normalize_name("name", value)
        .map(|_| ())
        .map_err(to_validation_error)
}
