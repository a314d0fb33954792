use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Referenced rows are protected: deleting a row that anything points at fails.
fn protected<FT, FC, TT, TC>(name: &str, from: (FT, FC), to: (TT, TC)) -> ForeignKeyCreateStatement
where
    FT: IntoIden + 'static,
    FC: IntoIden,
    TT: IntoIden + 'static,
    TC: IntoIden,
{
    ForeignKey::create()
        .name(name)
        .from(from.0, from.1)
        .to(to.0, to.1)
        .on_delete(ForeignKeyAction::Restrict)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::Username, 150).unique_key())
                    .col(boolean(Users::IsActive).default(true))
                    .col(timestamp_with_time_zone(Users::DateJoined))
                    .to_owned(),
            )
            .await?;

        // Create auth_tokens table (one token per user)
        manager
            .create_table(
                Table::create()
                    .table(AuthTokens::Table)
                    .if_not_exists()
                    .col(string_len(AuthTokens::Key, 32).primary_key())
                    .col(integer(AuthTokens::UserId).unique_key())
                    .col(timestamp_with_time_zone(AuthTokens::Created))
                    .foreign_key(&mut protected(
                        "fk_auth_tokens_user",
                        (AuthTokens::Table, AuthTokens::UserId),
                        (Users::Table, Users::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        // Create profiles table
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(pk_auto(Profiles::Id))
                    .col(string_len(Profiles::Currency, 3).default("CZK"))
                    .col(timestamp_with_time_zone(Profiles::Created))
                    .col(integer(Profiles::UserId))
                    .foreign_key(&mut protected(
                        "fk_profiles_user",
                        (Profiles::Table, Profiles::UserId),
                        (Users::Table, Users::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        // Create accounts table
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_auto(Accounts::Id))
                    .col(big_integer(Accounts::BalanceMinor).default(0))
                    .col(timestamp_with_time_zone(Accounts::Created))
                    .col(string_len(Accounts::Name, 32))
                    .col(integer(Accounts::ProfileId))
                    .col(integer(Accounts::UserId))
                    .foreign_key(&mut protected(
                        "fk_accounts_profile",
                        (Accounts::Table, Accounts::ProfileId),
                        (Profiles::Table, Profiles::Id),
                    ))
                    .foreign_key(&mut protected(
                        "fk_accounts_user",
                        (Accounts::Table, Accounts::UserId),
                        (Users::Table, Users::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        // Create budgets table
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(pk_auto(Budgets::Id))
                    .col(big_integer(Budgets::LimitMinor))
                    .col(small_integer(Budgets::PeriodInMonths))
                    .col(timestamp_with_time_zone(Budgets::Created))
                    .col(string_len(Budgets::Name, 32))
                    .col(integer(Budgets::ProfileId))
                    .col(integer(Budgets::UserId))
                    .foreign_key(&mut protected(
                        "fk_budgets_profile",
                        (Budgets::Table, Budgets::ProfileId),
                        (Profiles::Table, Profiles::Id),
                    ))
                    .foreign_key(&mut protected(
                        "fk_budgets_user",
                        (Budgets::Table, Budgets::UserId),
                        (Users::Table, Users::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        // Create activities table
        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(pk_auto(Activities::Id))
                    .col(big_integer(Activities::AmountMinor))
                    .col(timestamp_with_time_zone(Activities::Created))
                    .col(string_len(Activities::Name, 32))
                    .col(integer(Activities::AccountId))
                    .col(integer(Activities::UserId))
                    .foreign_key(&mut protected(
                        "fk_activities_account",
                        (Activities::Table, Activities::AccountId),
                        (Accounts::Table, Accounts::Id),
                    ))
                    .foreign_key(&mut protected(
                        "fk_activities_user",
                        (Activities::Table, Activities::UserId),
                        (Users::Table, Users::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        // Create incomes table
        manager
            .create_table(
                Table::create()
                    .table(Incomes::Table)
                    .if_not_exists()
                    .col(pk_auto(Incomes::Id))
                    .col(integer(Incomes::ActivityId).unique_key())
                    .foreign_key(&mut protected(
                        "fk_incomes_activity",
                        (Incomes::Table, Incomes::ActivityId),
                        (Activities::Table, Activities::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        // Create expenses table
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(pk_auto(Expenses::Id))
                    .col(integer(Expenses::ActivityId).unique_key())
                    .col(integer(Expenses::BudgetId))
                    .foreign_key(&mut protected(
                        "fk_expenses_activity",
                        (Expenses::Table, Expenses::ActivityId),
                        (Activities::Table, Activities::Id),
                    ))
                    .foreign_key(&mut protected(
                        "fk_expenses_budget",
                        (Expenses::Table, Expenses::BudgetId),
                        (Budgets::Table, Budgets::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        // Create transfers table
        manager
            .create_table(
                Table::create()
                    .table(Transfers::Table)
                    .if_not_exists()
                    .col(pk_auto(Transfers::Id))
                    .col(integer(Transfers::ActivityId).unique_key())
                    .col(integer(Transfers::ToAccountId))
                    .foreign_key(&mut protected(
                        "fk_transfers_activity",
                        (Transfers::Table, Transfers::ActivityId),
                        (Activities::Table, Activities::Id),
                    ))
                    .foreign_key(&mut protected(
                        "fk_transfers_to_account",
                        (Transfers::Table, Transfers::ToAccountId),
                        (Accounts::Table, Accounts::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        // Listing activities for a user is the hot read path
        manager
            .create_index(
                Index::create()
                    .name("idx_activities_user")
                    .table(Activities::Table)
                    .col(Activities::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transfers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Incomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuthTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    IsActive,
    DateJoined,
}

#[derive(DeriveIden)]
enum AuthTokens {
    Table,
    Key,
    UserId,
    Created,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    Currency,
    Created,
    UserId,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    BalanceMinor,
    Created,
    Name,
    ProfileId,
    UserId,
}

#[derive(DeriveIden)]
enum Budgets {
    Table,
    Id,
    LimitMinor,
    PeriodInMonths,
    Created,
    Name,
    ProfileId,
    UserId,
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Id,
    AmountMinor,
    Created,
    Name,
    AccountId,
    UserId,
}

#[derive(DeriveIden)]
enum Incomes {
    Table,
    Id,
    ActivityId,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    Id,
    ActivityId,
    BudgetId,
}

#[derive(DeriveIden)]
enum Transfers {
    Table,
    Id,
    ActivityId,
    ToAccountId,
}
