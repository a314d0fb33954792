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
use model::entities::income;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for recording an income
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateIncomeRequest {
    #[validate(nested)]
    pub activity: ActivityPayload,
}

/// Income response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IncomeResponse {
    pub id: i32,
    pub activity: ActivityResponse,
}

impl From<Recorded<income::Model>> for IncomeResponse {
    fn from(recorded: Recorded<income::Model>) -> Self {
        Self {
            id: recorded.record.id,
            activity: ActivityResponse::from(recorded.activity),
        }
    }
}

/// List the caller's incomes
#[utoipa::path(
    get,
    path = "/api/v1/incomes",
    tag = "incomes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Incomes retrieved successfully", body = ApiResponse<Vec<IncomeResponse>>),
        (status = 401, description = "Not authenticated", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_incomes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<IncomeResponse>>>, ApiError> {
    trace!("Entering list_incomes for user {}", user.id);

    let incomes = ledger::activities::list_incomes(&state.db, user.id)
        .await
        .map_err(|e| {
            error!("Failed to list incomes for user {}: {}", user.id, e);
            ledger_error(e)
        })?;

    debug!("Returning {} incomes", incomes.len());
    Ok(Json(ApiResponse::new(
        incomes.into_iter().map(IncomeResponse::from).collect(),
        "Incomes retrieved successfully",
    )))
}

/// Record an income, crediting the activity's account
#[utoipa::path(
    post,
    path = "/api/v1/incomes",
    tag = "incomes",
    security(("bearer_auth" = [])),
    request_body = CreateIncomeRequest,
    responses(
        (status = 201, description = "Income recorded successfully", body = ApiResponse<IncomeResponse>),
        (status = 400, description = "Invalid request or foreign account", body = crate::schemas::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_income(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(request): ValidatedJson<CreateIncomeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<IncomeResponse>>), ApiError> {
    trace!("Entering create_income for user {}", user.id);
    let new_activity = request.activity.into_new_activity(&user)?;

    let recorded = ledger::activities::record_income(&state.db, user.id, new_activity)
        .await
        .map_err(ledger_error)?;

    info!("Income {} recorded for user {}", recorded.record.id, user.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            IncomeResponse::from(recorded),
            "Income recorded successfully",
        )),
    ))
}
