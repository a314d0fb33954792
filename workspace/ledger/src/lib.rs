//! Bookkeeping operations on top of the `model` entities.
//!
//! Every write is scoped to an acting user: referenced rows are loaded and
//! passed through the ownership guard before anything is persisted, and the
//! income/expense/transfer flows run as a single database transaction.

pub mod accounts;
pub mod activities;
pub mod budgets;
pub mod error;
pub mod guard;
pub mod profiles;
pub mod references;
pub mod users;
pub mod validation;

#[cfg(test)]
mod testing;

pub use error::{LedgerError, Result};
pub use guard::{Owned, check_user, load_owned};
