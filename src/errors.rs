//! Mapping of failures onto JSON error responses.

use crate::schemas::ErrorResponse;
use axum::{http::StatusCode, response::Json};
use ledger::LedgerError;
use tracing::{error, warn};

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
            success: false,
        }),
    )
}

pub fn ledger_error(err: LedgerError) -> ApiError {
    match err {
        LedgerError::Validation { .. } => {
            api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
        }
        LedgerError::OwnershipMismatch { .. } => {
            api_error(StatusCode::BAD_REQUEST, "USER_MISMATCH", err.to_string())
        }
        LedgerError::NotFound { .. } => {
            api_error(StatusCode::BAD_REQUEST, "DOES_NOT_EXIST", err.to_string())
        }
        LedgerError::Protected { .. } => {
            warn!("{}", err);
            api_error(StatusCode::CONFLICT, "PROTECTED", err.to_string())
        }
        LedgerError::Database(db_error) => {
            error!("Database error: {}", db_error);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "Database error",
            )
        }
    }
}
