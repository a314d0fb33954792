use super::{account, activity};
use sea_orm::entity::prelude::*;

/// Money moved from the activity's account into `to_account_id`.
/// Source and destination may be the same account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub activity_id: i32,
    pub to_account_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "activity::Entity",
        from = "Column::ActivityId",
        to = "activity::Column::Id",
        on_delete = "Restrict"
    )]
    Activity,
    #[sea_orm(
        belongs_to = "account::Entity",
        from = "Column::ToAccountId",
        to = "account::Column::Id",
        on_delete = "Restrict"
    )]
    ToAccount,
}

impl Related<activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activity.def()
    }
}

impl Related<account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ToAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
