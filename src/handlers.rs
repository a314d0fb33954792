pub mod accounts;
pub mod activities;
pub mod budgets;
pub mod health;
pub mod profiles;
