use crate::auth::{AuthUser, check_body_user};
use crate::errors::{ApiError, ledger_error};
use crate::extract::ValidatedJson;
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use ledger::budgets::NewBudget;
use model::entities::budget;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a budget
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateBudgetRequest {
    /// Budget name, at most 32 characters
    #[validate(custom(function = "crate::validation::validate_name"))]
    pub name: String,
    /// Spending limit, at least 0.01
    #[schema(value_type = String, example = "500.00")]
    #[validate(custom(function = "crate::validation::validate_limit"))]
    pub limit: Decimal,
    /// Length of the budget period in months
    #[validate(range(min = 1))]
    pub period_in_months: i16,
    /// Profile the budget belongs to
    pub profile: i32,
    /// Owning user; defaults to the caller and must match it when given
    pub user: Option<i32>,
}

/// Budget response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BudgetResponse {
    pub id: i32,
    #[schema(value_type = String, example = "500.00")]
    pub limit: Decimal,
    pub period_in_months: i16,
    pub created: DateTime<Utc>,
    pub name: String,
    pub profile: i32,
    pub user: i32,
    /// Sum of the expenses attributed to this budget. Informational, the limit is not enforced.
    #[schema(value_type = String, example = "120.00")]
    pub spent: Decimal,
}

impl BudgetResponse {
    fn new(model: budget::Model, spent: Decimal) -> Self {
        Self {
            id: model.id,
            limit: model.limit(),
            period_in_months: model.period_in_months,
            created: model.created,
            name: model.name,
            profile: model.profile_id,
            user: model.user_id,
            spent,
        }
    }
}

/// List the caller's budgets with what has been spent against each
#[utoipa::path(
    get,
    path = "/api/v1/budgets",
    tag = "budgets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Budgets retrieved successfully", body = ApiResponse<Vec<BudgetResponse>>),
        (status = 401, description = "Not authenticated", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_budgets(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<BudgetResponse>>>, ApiError> {
    trace!("Entering list_budgets for user {}", user.id);

    let budgets = ledger::budgets::list_budgets(&state.db, user.id)
        .await
        .map_err(|e| {
            error!("Failed to list budgets for user {}: {}", user.id, e);
            ledger_error(e)
        })?;
    let spent = ledger::budgets::spent_by_budget(&state.db, user.id)
        .await
        .map_err(ledger_error)?;

    debug!("Returning {} budgets", budgets.len());
    let data = budgets
        .into_iter()
        .map(|budget| {
            let spent = spent.get(&budget.id).copied().unwrap_or(Decimal::new(0, 2));
            BudgetResponse::new(budget, spent)
        })
        .collect();
    Ok(Json(ApiResponse::new(data, "Budgets retrieved successfully")))
}

/// Create a budget
#[utoipa::path(
    post,
    path = "/api/v1/budgets",
    tag = "budgets",
    security(("bearer_auth" = [])),
    request_body = CreateBudgetRequest,
    responses(
        (status = 201, description = "Budget created successfully", body = ApiResponse<BudgetResponse>),
        (status = 400, description = "Invalid request or foreign profile", body = crate::schemas::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_budget(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(request): ValidatedJson<CreateBudgetRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BudgetResponse>>), ApiError> {
    trace!("Entering create_budget for user {}", user.id);
    check_body_user(request.user, &user)?;

    let budget = ledger::budgets::create_budget(
        &state.db,
        user.id,
        NewBudget {
            name: request.name,
            limit: request.limit,
            period_in_months: request.period_in_months,
            profile_id: request.profile,
        },
    )
    .await
    .map_err(ledger_error)?;

    info!("Budget {} created for user {}", budget.id, user.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            BudgetResponse::new(budget, Decimal::new(0, 2)),
            "Budget created successfully",
        )),
    ))
}
