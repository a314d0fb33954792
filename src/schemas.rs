use crate::auth::AuthUser;
use crate::handlers::accounts::{AccountResponse, CreateAccountRequest};
use crate::handlers::activities::{
    ActivityPayload, ActivityResponse,
    expenses::{CreateExpenseRequest, ExpenseResponse},
    incomes::{CreateIncomeRequest, IncomeResponse},
    transfers::{CreateTransferRequest, TransferResponse},
};
use crate::handlers::budgets::{BudgetResponse, CreateBudgetRequest};
use crate::handlers::profiles::{CreateProfileRequest, ProfileResponse};
use model::entities::profile::Currency;
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Resolved API tokens, keyed by token key
    pub tokens: Cache<String, AuthUser>,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine readable error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::profiles::list_profiles,
        crate::handlers::profiles::create_profile,
        crate::handlers::accounts::list_accounts,
        crate::handlers::accounts::create_account,
        crate::handlers::accounts::get_account,
        crate::handlers::budgets::list_budgets,
        crate::handlers::budgets::create_budget,
        crate::handlers::activities::incomes::list_incomes,
        crate::handlers::activities::incomes::create_income,
        crate::handlers::activities::expenses::list_expenses,
        crate::handlers::activities::expenses::create_expense,
        crate::handlers::activities::transfers::list_transfers,
        crate::handlers::activities::transfers::create_transfer,
    ),
    components(
        schemas(
            ApiResponse<ProfileResponse>,
            ApiResponse<Vec<ProfileResponse>>,
            ApiResponse<AccountResponse>,
            ApiResponse<Vec<AccountResponse>>,
            ApiResponse<BudgetResponse>,
            ApiResponse<Vec<BudgetResponse>>,
            ApiResponse<IncomeResponse>,
            ApiResponse<Vec<IncomeResponse>>,
            ApiResponse<ExpenseResponse>,
            ApiResponse<Vec<ExpenseResponse>>,
            ApiResponse<TransferResponse>,
            ApiResponse<Vec<TransferResponse>>,
            ErrorResponse,
            HealthResponse,
            Currency,
            CreateProfileRequest,
            ProfileResponse,
            CreateAccountRequest,
            AccountResponse,
            CreateBudgetRequest,
            BudgetResponse,
            ActivityPayload,
            ActivityResponse,
            CreateIncomeRequest,
            IncomeResponse,
            CreateExpenseRequest,
            ExpenseResponse,
            CreateTransferRequest,
            TransferResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "profiles", description = "Currency-scoped groups of accounts and budgets"),
        (name = "accounts", description = "Balance-holding accounts"),
        (name = "budgets", description = "Spending limits over a number of months"),
        (name = "incomes", description = "Money coming into an account"),
        (name = "expenses", description = "Money leaving an account against a budget"),
        (name = "transfers", description = "Money moved between two accounts"),
    ),
    info(
        title = "Pocketbook API",
        description = "Personal bookkeeping API: profiles, accounts, budgets and the activities that move money between them",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
