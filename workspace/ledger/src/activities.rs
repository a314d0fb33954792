//! Income, expense and transfer recording.
//!
//! Each flow writes an activity row, adjusts one or two account balances and
//! writes the subtype row inside a single transaction. Balances are changed
//! with `balance = balance + delta` in the database so that concurrent writers
//! on the same account never overwrite each other.

use crate::validation::{check_amount, normalize_name};
use crate::{LedgerError, Result, load_owned};
use chrono::Utc;
use model::constraints::{MAX_BALANCE_MINOR, MAX_DECIMAL_DIGITS};
use model::entities::{account, activity, budget, expense, income, transfer};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Related, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, trace, warn};

/// The activity part of an income, expense or transfer request.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub name: String,
    /// Always positive; the direction comes from the subtype.
    pub amount: Decimal,
    /// The credited or debited account, the source for transfers.
    pub account_id: i32,
}

/// A subtype row together with the activity it wraps.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded<T> {
    pub record: T,
    pub activity: activity::Model,
}

struct CheckedActivity {
    name: String,
    amount_minor: i64,
    account_id: i32,
}

fn check_activity(new_activity: NewActivity) -> Result<CheckedActivity> {
    Ok(CheckedActivity {
        name: normalize_name("name", &new_activity.name)?,
        amount_minor: check_amount("amount", new_activity.amount)?,
        account_id: new_activity.account_id,
    })
}

async fn insert_activity(
    txn: &DatabaseTransaction,
    user_id: i32,
    checked: &CheckedActivity,
) -> Result<activity::Model> {
    let activity = activity::ActiveModel {
        amount_minor: Set(checked.amount_minor),
        created: Set(Utc::now()),
        name: Set(checked.name.clone()),
        account_id: Set(checked.account_id),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    trace!("Inserted activity {} for user {}", activity.id, user_id);
    Ok(activity)
}

/// Adds `delta_minor` to the stored balance in a single UPDATE.
///
/// The row only matches while the new balance still fits the money column, so
/// an overflowing delta changes nothing and fails the surrounding transaction.
async fn apply_delta(txn: &DatabaseTransaction, account_id: i32, delta_minor: i64) -> Result<()> {
    let result = account::Entity::update_many()
        .col_expr(
            account::Column::BalanceMinor,
            Expr::col(account::Column::BalanceMinor).add(delta_minor),
        )
        .filter(account::Column::Id.eq(account_id))
        .filter(account::Column::BalanceMinor.lte(MAX_BALANCE_MINOR - delta_minor))
        .filter(account::Column::BalanceMinor.gte(-MAX_BALANCE_MINOR - delta_minor))
        .exec(txn)
        .await?;
    if result.rows_affected == 1 {
        trace!("Applied delta {} to account {}", delta_minor, account_id);
        return Ok(());
    }

    if account::Entity::find_by_id(account_id).one(txn).await?.is_none() {
        return Err(LedgerError::NotFound {
            entity: "account",
            id: account_id,
        });
    }
    warn!("Delta {} would push account {} out of range", delta_minor, account_id);
    Err(LedgerError::validation(
        "balance",
        format!("Ensure that there are no more than {MAX_DECIMAL_DIGITS} digits in total."),
    ))
}

/// Records money coming into one of the user's accounts.
#[instrument(skip(db))]
pub async fn record_income(
    db: &DatabaseConnection,
    user_id: i32,
    new_activity: NewActivity,
) -> Result<Recorded<income::Model>> {
    let checked = check_activity(new_activity)?;

    let txn = db.begin().await?;
    load_owned::<account::Entity, _>(&txn, checked.account_id, user_id).await?;
    let activity = insert_activity(&txn, user_id, &checked).await?;
    apply_delta(&txn, checked.account_id, checked.amount_minor).await?;
    let record = income::ActiveModel {
        activity_id: Set(activity.id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(
        "Income {} of {} recorded on account {}",
        record.id,
        activity.amount(),
        activity.account_id
    );
    Ok(Recorded { record, activity })
}

/// Records money leaving one of the user's accounts against one of their budgets.
///
/// The budget's limit is not checked.
#[instrument(skip(db))]
pub async fn record_expense(
    db: &DatabaseConnection,
    user_id: i32,
    new_activity: NewActivity,
    budget_id: i32,
) -> Result<Recorded<expense::Model>> {
    let checked = check_activity(new_activity)?;

    let txn = db.begin().await?;
    load_owned::<account::Entity, _>(&txn, checked.account_id, user_id).await?;
    let budget = load_owned::<budget::Entity, _>(&txn, budget_id, user_id).await?;
    let activity = insert_activity(&txn, user_id, &checked).await?;
    apply_delta(&txn, checked.account_id, -checked.amount_minor).await?;
    let record = expense::ActiveModel {
        activity_id: Set(activity.id),
        budget_id: Set(budget.id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(
        "Expense {} of {} recorded on account {} against budget {}",
        record.id,
        activity.amount(),
        activity.account_id,
        budget.id
    );
    Ok(Recorded { record, activity })
}

/// Moves money between two of the user's accounts.
///
/// Source and destination may be the same account, in which case only the
/// activity is recorded and the balance ends up unchanged.
#[instrument(skip(db))]
pub async fn record_transfer(
    db: &DatabaseConnection,
    user_id: i32,
    new_activity: NewActivity,
    to_account_id: i32,
) -> Result<Recorded<transfer::Model>> {
    let checked = check_activity(new_activity)?;

    let txn = db.begin().await?;
    load_owned::<account::Entity, _>(&txn, checked.account_id, user_id).await?;
    let destination = load_owned::<account::Entity, _>(&txn, to_account_id, user_id).await?;
    let activity = insert_activity(&txn, user_id, &checked).await?;
    apply_delta(&txn, checked.account_id, -checked.amount_minor).await?;
    apply_delta(&txn, destination.id, checked.amount_minor).await?;
    let record = transfer::ActiveModel {
        activity_id: Set(activity.id),
        to_account_id: Set(destination.id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(
        "Transfer {} of {} recorded from account {} to account {}",
        record.id,
        activity.amount(),
        activity.account_id,
        destination.id
    );
    Ok(Recorded { record, activity })
}

/// Subtype rows joined with their activity, restricted to the user's activities.
async fn list_with_activity<E, C>(conn: &C, user_id: i32) -> Result<Vec<Recorded<E::Model>>>
where
    E: EntityTrait + Related<activity::Entity>,
    C: ConnectionTrait,
{
    let rows = E::find()
        .find_also_related(activity::Entity)
        .filter(activity::Column::UserId.eq(user_id))
        .order_by_asc(activity::Column::Id)
        .all(conn)
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(record, activity)| activity.map(|activity| Recorded { record, activity }))
        .collect())
}

#[instrument(skip(conn))]
pub async fn list_incomes<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<Vec<Recorded<income::Model>>> {
    let incomes = list_with_activity::<income::Entity, _>(conn, user_id).await?;
    debug!("Retrieved {} incomes for user {}", incomes.len(), user_id);
    Ok(incomes)
}

#[instrument(skip(conn))]
pub async fn list_expenses<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<Vec<Recorded<expense::Model>>> {
    let expenses = list_with_activity::<expense::Entity, _>(conn, user_id).await?;
    debug!("Retrieved {} expenses for user {}", expenses.len(), user_id);
    Ok(expenses)
}

#[instrument(skip(conn))]
pub async fn list_transfers<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
) -> Result<Vec<Recorded<transfer::Model>>> {
    let transfers = list_with_activity::<transfer::Entity, _>(conn, user_id).await?;
    debug!("Retrieved {} transfers for user {}", transfers.len(), user_id);
    Ok(transfers)
}
