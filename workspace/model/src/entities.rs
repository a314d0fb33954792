//! SeaORM entities for the bookkeeping ledger.
//!
//! Every owned row carries a `user_id`. Foreign keys are `RESTRICT` on delete,
//! so a row that is referenced anywhere cannot be removed.

pub mod account;
pub mod activity;
pub mod auth_token;
pub mod budget;
pub mod expense;
pub mod income;
pub mod profile;
pub mod transfer;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::account::Entity as Account;
    pub use super::activity::Entity as Activity;
    pub use super::auth_token::Entity as AuthToken;
    pub use super::budget::Entity as Budget;
    pub use super::expense::Entity as Expense;
    pub use super::income::Entity as Income;
    pub use super::profile::Entity as Profile;
    pub use super::transfer::Entity as Transfer;
    pub use super::user::Entity as User;
}
