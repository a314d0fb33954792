use thiserror::Error;

/// Error types for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A field failed its constraint
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    /// A referenced row belongs to a different user
    #[error("User mismatch in a foreign field: {entity} {id}")]
    OwnershipMismatch { entity: &'static str, id: i32 },

    /// A referenced row does not exist
    #[error("Invalid pk \"{id}\" - {entity} does not exist")]
    NotFound { entity: &'static str, id: i32 },

    /// A row cannot be deleted while other rows reference it
    #[error("Cannot delete {entity} {id}: referenced by {dependents} row(s)")]
    Protected {
        entity: &'static str,
        id: i32,
        dependents: u64,
    },
}

impl LedgerError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        LedgerError::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Type alias for Result with LedgerError
pub type Result<T> = std::result::Result<T, LedgerError>;
