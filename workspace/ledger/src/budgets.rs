use crate::activities::list_expenses;
use crate::validation::{check_amount, check_period, normalize_name};
use crate::{Result, load_owned};
use chrono::Utc;
use model::entities::{budget, profile};
use model::money::from_minor;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Input for [`create_budget`].
#[derive(Debug, Clone)]
pub struct NewBudget {
    pub name: String,
    pub limit: Decimal,
    pub period_in_months: i16,
    pub profile_id: i32,
}

/// Creates a budget under one of the user's own profiles.
#[instrument(skip(db))]
pub async fn create_budget(
    db: &DatabaseConnection,
    user_id: i32,
    new_budget: NewBudget,
) -> Result<budget::Model> {
    let name = normalize_name("name", &new_budget.name)?;
    let limit_minor = check_amount("limit", new_budget.limit)?;
    check_period("period_in_months", new_budget.period_in_months)?;

    let txn = db.begin().await?;
    let profile = load_owned::<profile::Entity, _>(&txn, new_budget.profile_id, user_id).await?;
    let budget = budget::ActiveModel {
        limit_minor: Set(limit_minor),
        period_in_months: Set(new_budget.period_in_months),
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
        "Budget created with ID: {}, name: {}, limit: {} per {} month(s)",
        budget.id,
        budget.name,
        budget.limit(),
        budget.period_in_months
    );
    Ok(budget)
}

/// Budgets owned by `user_id`, oldest first.
#[instrument(skip(conn))]
pub async fn list_budgets<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<Vec<budget::Model>> {
    let budgets = budget::Entity::find()
        .filter(budget::Column::UserId.eq(user_id))
        .order_by_asc(budget::Column::Id)
        .all(conn)
        .await?;
    debug!("Retrieved {} budgets for user {}", budgets.len(), user_id);
    Ok(budgets)
}

/// Total of the user's expenses per budget id.
///
/// Reporting only: the limit is never enforced when an expense is recorded.
#[instrument(skip(conn))]
pub async fn spent_by_budget<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<HashMap<i32, Decimal>> {
    let mut totals: HashMap<i32, i64> = HashMap::new();
    for expense in list_expenses(conn, user_id).await? {
        *totals.entry(expense.record.budget_id).or_default() += expense.activity.amount_minor;
    }
    Ok(totals
        .into_iter()
        .map(|(budget_id, minor)| (budget_id, from_minor(minor)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LedgerError;
    use crate::activities::{NewActivity, record_expense};
    use crate::testing::{seed_account, seed_profile, seed_user, setup_db};

    fn groceries(profile_id: i32, limit: Decimal) -> NewBudget {
        NewBudget {
            name: "Groceries".to_string(),
            limit,
            period_in_months: 1,
            profile_id,
        }
    }

    #[tokio::test]
    async fn limit_and_period_are_validated() {
        let db = setup_db().await;
        let alice = seed_user(&db, "alice").await;
        let profile = seed_profile(&db, alice.id).await;

        let zero_limit = create_budget(&db, alice.id, groceries(profile.id, Decimal::ZERO)).await;
        assert!(matches!(zero_limit, Err(LedgerError::Validation { field: "limit", .. })));

        let mut no_period = groceries(profile.id, Decimal::new(100, 0));
        no_period.period_in_months = 0;
        let result = create_budget(&db, alice.id, no_period).await;
        assert!(matches!(result, Err(LedgerError::Validation { field: "period_in_months", .. })));

        assert!(list_budgets(&db, alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn budget_under_foreign_profile_is_rejected() {
        let db = setup_db().await;
        let alice = seed_user(&db, "alice").await;
        let bob = seed_user(&db, "bob").await;
        let bobs_profile = seed_profile(&db, bob.id).await;

        let result = create_budget(&db, alice.id, groceries(bobs_profile.id, Decimal::new(50, 0))).await;
        assert!(matches!(result, Err(LedgerError::OwnershipMismatch { .. })));
    }

    #[tokio::test]
    async fn overspending_is_tracked_not_blocked() {
        let db = setup_db().await;
        let alice = seed_user(&db, "alice").await;
        let profile = seed_profile(&db, alice.id).await;
        let account = seed_account(&db, &profile, "Cash").await;
        let budget = create_budget(&db, alice.id, groceries(profile.id, Decimal::new(1000, 2)))
            .await
            .unwrap();

        for amount in [Decimal::new(800, 2), Decimal::new(550, 2)] {
            record_expense(
                &db,
                alice.id,
                NewActivity {
                    name: "Market".to_string(),
                    amount,
                    account_id: account.id,
                },
                budget.id,
            )
            .await
            .unwrap();
        }

        let spent = spent_by_budget(&db, alice.id).await.unwrap();
        assert_eq!(spent.get(&budget.id).map(|d| d.to_string()), Some("13.50".to_string()));
        assert!(spent[&budget.id] > budget.limit());
    }
}
