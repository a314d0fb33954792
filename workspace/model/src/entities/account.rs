use super::{profile, user};
use crate::money::from_minor;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// A balance-holding entity affected by activities.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Current balance in hundredths. Only ever changed by adding a signed delta.
    pub balance_minor: i64,
    pub created: DateTimeUtc,
    pub name: String,
    pub profile_id: i32,
    /// Always equal to the owning user of the profile.
    pub user_id: i32,
}

impl Model {
    pub fn balance(&self) -> Decimal {
        from_minor(self.balance_minor)
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
