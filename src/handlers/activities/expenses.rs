use super::{ActivityPayload, ActivityResponse};
use crate::auth::AuthUser;
use crate::errors::{ApiError, ledger_error};
use crate::extract::ValidatedJson;
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
};
use ledger::activities::Recorded;
use model::entities::expense;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for recording an expense
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateExpenseRequest {
    #[validate(nested)]
    pub activity: ActivityPayload,
    /// Budget the expense is attributed to
    pub budget: i32,
}

/// Expense response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpenseResponse {
    pub id: i32,
    pub activity: ActivityResponse,
    pub budget: i32,
}

impl From<Recorded<expense::Model>> for ExpenseResponse {
    fn from(recorded: Recorded<expense::Model>) -> Self {
        Self {
            id: recorded.record.id,
            activity: ActivityResponse::from(recorded.activity),
            budget: recorded.record.budget_id,
        }
    }
}

/// List the caller's expenses
#[utoipa::path(
    get,
    path = "/api/v1/expenses",
    tag = "expenses",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Expenses retrieved successfully", body = ApiResponse<Vec<ExpenseResponse>>),
        (status = 401, description = "Not authenticated", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<ExpenseResponse>>>, ApiError> {
    trace!("Entering list_expenses for user {}", user.id);

    let expenses = ledger::activities::list_expenses(&state.db, user.id)
        .await
        .map_err(|e| {
            error!("Failed to list expenses for user {}: {}", user.id, e);
            ledger_error(e)
        })?;

    debug!("Returning {} expenses", expenses.len());
    Ok(Json(ApiResponse::new(
        expenses.into_iter().map(ExpenseResponse::from).collect(),
        "Expenses retrieved successfully",
    )))
}

/// Record an expense, debiting the activity's account
///
/// The budget's limit is not enforced.
#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    tag = "expenses",
    security(("bearer_auth" = [])),
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense recorded successfully", body = ApiResponse<ExpenseResponse>),
        (status = 400, description = "Invalid request, foreign account or foreign budget", body = crate::schemas::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_expense(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(request): ValidatedJson<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ExpenseResponse>>), ApiError> {
    trace!("Entering create_expense for user {}", user.id);
    let new_activity = request.activity.into_new_activity(&user)?;

    let recorded =
        ledger::activities::record_expense(&state.db, user.id, new_activity, request.budget)
            .await
            .map_err(ledger_error)?;

    info!(
        "Expense {} recorded for user {} against budget {}",
        recorded.record.id, user.id, recorded.record.budget_id
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            ExpenseResponse::from(recorded),
            "Expense recorded successfully",
        )),
    ))
}
