use crate::validation::{check_balance, normalize_name};
use crate::{Result, load_owned};
use chrono::Utc;
use model::entities::{account, profile};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, trace};

/// Input for [`create_account`].
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    /// Opening balance, zero when absent.
    pub balance: Option<Decimal>,
    pub profile_id: i32,
}

/// Creates an account under one of the user's own profiles.
#[instrument(skip(db))]
pub async fn create_account(
    db: &DatabaseConnection,
    user_id: i32,
    new_account: NewAccount,
) -> Result<account::Model> {
    let name = normalize_name("name", &new_account.name)?;
    let balance_minor = check_balance("balance", new_account.balance.unwrap_or_default())?;

    let txn = db.begin().await?;
    let profile = load_owned::<profile::Entity, _>(&txn, new_account.profile_id, user_id).await?;

    trace!("Inserting account '{}' into profile {}", name, profile.id);
    let account = account::ActiveModel {
        balance_minor: Set(balance_minor),
        created: Set(Utc::now()),
        name: Set(name),
        profile_id: Set(profile.id),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(
        "Account created with ID: {}, name: {}, balance: {}",
        account.id,
        account.name,
        account.balance()
    );
    Ok(account)
}

/// Accounts owned by `user_id`, oldest first.
#[instrument(skip(conn))]
pub async fn list_accounts<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<Vec<account::Model>> {
    let accounts = account::Entity::find()
        .filter(account::Column::UserId.eq(user_id))
        .order_by_asc(account::Column::Id)
        .all(conn)
        .await?;
    debug!("Retrieved {} accounts for user {}", accounts.len(), user_id);
    Ok(accounts)
}

/// One of the user's accounts; `None` when it does not exist or belongs to someone else.
pub async fn find_account<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    account_id: i32,
) -> Result<Option<account::Model>> {
    Ok(account::Entity::find_by_id(account_id)
        .filter(account::Column::UserId.eq(user_id))
        .one(conn)
        .await?)
}
