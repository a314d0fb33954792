//! Income, expense and transfer endpoints.
//!
//! All three take the same nested `activity` payload and differ only in the
//! extra reference they carry and in the direction the balance moves.

pub mod expenses;
pub mod incomes;
pub mod transfers;

use crate::auth::{AuthUser, check_body_user};
use crate::errors::ApiError;
use chrono::{DateTime, Utc};
use ledger::activities::NewActivity;
use model::entities::activity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// The activity part of an income, expense or transfer
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ActivityPayload {
    /// Short description, at most 32 characters
    #[validate(custom(function = "crate::validation::validate_name"))]
    pub name: String,
    /// Positive amount, at least 0.01
    #[schema(value_type = String, example = "100.00")]
    #[validate(custom(function = "crate::validation::validate_amount"))]
    pub amount: Decimal,
    /// Account credited or debited; the source account for transfers
    pub account: i32,
    /// Owning user; defaults to the caller and must match it when given
    pub user: Option<i32>,
}

impl ActivityPayload {
    /// Checks the body `user` field and converts into the ledger input.
    pub(crate) fn into_new_activity(self, caller: &AuthUser) -> Result<NewActivity, ApiError> {
        check_body_user(self.user, caller)?;
        Ok(NewActivity {
            name: self.name,
            amount: self.amount,
            account_id: self.account,
        })
    }
}

/// Activity response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityResponse {
    pub id: i32,
    #[schema(value_type = String, example = "100.00")]
    pub amount: Decimal,
    pub created: DateTime<Utc>,
    pub name: String,
    pub account: i32,
    pub user: i32,
}

impl From<activity::Model> for ActivityResponse {
    fn from(model: activity::Model) -> Self {
        Self {
            id: model.id,
            amount: model.amount(),
            created: model.created,
            name: model.name,
            account: model.account_id,
            user: model.user_id,
        }
    }
}
