use super::{account, user};
use crate::money::from_minor;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// The common ledger entry underlying an income, an expense or a transfer.
///
/// The amount is always positive; the direction of the balance change is
/// given by which of the three subtype rows points at the activity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub amount_minor: i64,
    pub created: DateTimeUtc,
    pub name: String,
    /// For transfers this is the source account.
    pub account_id: i32,
    pub user_id: i32,
}

impl Model {
    pub fn amount(&self) -> Decimal {
        from_minor(self.amount_minor)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "account::Entity",
        from = "Column::AccountId",
        to = "account::Column::Id",
        on_delete = "Restrict"
    )]
    Account,
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id",
        on_delete = "Restrict"
    )]
    User,
}

impl Related<account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
