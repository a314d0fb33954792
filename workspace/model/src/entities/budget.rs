use super::{profile, user};
use crate::money::from_minor;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// A spending limit over a number of months.
/// Expenses are attributed to a budget but never checked against its limit.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub limit_minor: i64,
    pub period_in_months: i16,
    pub created: DateTimeUtc,
    pub name: String,
    pub profile_id: i32,
    pub user_id: i32,
}

impl Model {
    pub fn limit(&self) -> Decimal {
        from_minor(self.limit_minor)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "profile::Entity",
        from = "Column::ProfileId",
        to = "profile::Column::Id",
        on_delete = "Restrict"
    )]
    Profile,
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id",
        on_delete = "Restrict"
    )]
    User,
}

impl Related<profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
