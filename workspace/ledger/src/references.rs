//! Delete protection for referenced rows.
//!
//! Nothing is ever deleted through the API. These functions exist for
//! maintenance and refuse to remove a row while anything still points at it,
//! on top of the `ON DELETE RESTRICT` foreign keys.

use crate::{LedgerError, Result};
use model::entities::{account, activity, budget, expense, profile, transfer};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    TransactionTrait,
};
use tracing::{info, instrument, warn};

async fn delete_unreferenced<E: EntityTrait>(
    txn: DatabaseTransaction,
    entity: &'static str,
    id: i32,
    dependents: u64,
) -> Result<()>
where
    <E::PrimaryKey as sea_orm::PrimaryKeyTrait>::ValueType: From<i32>,
{
    if dependents > 0 {
        warn!("Refusing to delete {} {}: {} dependent row(s)", entity, id, dependents);
        return Err(LedgerError::Protected { entity, id, dependents });
    }
    let result = E::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(LedgerError::NotFound { entity, id });
    }
    txn.commit().await?;
    info!("Deleted {} {}", entity, id);
    Ok(())
}

/// Deletes a profile with no accounts or budgets.
#[instrument(skip(db))]
pub async fn delete_profile(db: &DatabaseConnection, id: i32) -> Result<()> {
    let txn = db.begin().await?;
    let dependents = account::Entity::find()
        .filter(account::Column::ProfileId.eq(id))
        .count(&txn)
        .await?
        + budget::Entity::find()
            .filter(budget::Column::ProfileId.eq(id))
            .count(&txn)
            .await?;
    delete_unreferenced::<profile::Entity>(txn, "profile", id, dependents).await
}

/// Deletes an account that no activity or transfer refers to.
#[instrument(skip(db))]
pub async fn delete_account(db: &DatabaseConnection, id: i32) -> Result<()> {
    let txn = db.begin().await?;
    let dependents = activity::Entity::find()
        .filter(activity::Column::AccountId.eq(id))
        .count(&txn)
        .await?
        + transfer::Entity::find()
            .filter(transfer::Column::ToAccountId.eq(id))
            .count(&txn)
            .await?;
    delete_unreferenced::<account::Entity>(txn, "account", id, dependents).await
}

/// Deletes a budget no expense is attributed to.
#[instrument(skip(db))]
pub async fn delete_budget(db: &DatabaseConnection, id: i32) -> Result<()> {
    let txn = db.begin().await?;
    let dependents = expense::Entity::find()
        .filter(expense::Column::BudgetId.eq(id))
        .count(&txn)
        .await?;
    delete_unreferenced::<budget::Entity>(txn, "budget", id, dependents).await
}
