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
use model::entities::transfer;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for recording a transfer
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateTransferRequest {
    /// The activity; its account is the source
    #[validate(nested)]
    pub activity: ActivityPayload,
    /// Destination account, may equal the source
    pub account: i32,
}

/// Transfer response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransferResponse {
    pub id: i32,
    pub activity: ActivityResponse,
    /// Destination account
    pub account: i32,
}

impl From<Recorded<transfer::Model>> for TransferResponse {
    fn from(recorded: Recorded<transfer::Model>) -> Self {
        Self {
            id: recorded.record.id,
            activity: ActivityResponse::from(recorded.activity),
            account: recorded.record.to_account_id,
        }
    }
}

/// List the caller's transfers
#[utoipa::path(
    get,
    path = "/api/v1/transfers",
    tag = "transfers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Transfers retrieved successfully", body = ApiResponse<Vec<TransferResponse>>),
        (status = 401, description = "Not authenticated", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_transfers(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<TransferResponse>>>, ApiError> {
    trace!("Entering list_transfers for user {}", user.id);

    let transfers = ledger::activities::list_transfers(&state.db, user.id)
        .await
        .map_err(|e| {
            error!("Failed to list transfers for user {}: {}", user.id, e);
            ledger_error(e)
        })?;

    debug!("Returning {} transfers", transfers.len());
    Ok(Json(ApiResponse::new(
        transfers.into_iter().map(TransferResponse::from).collect(),
        "Transfers retrieved successfully",
    )))
}

/// Record a transfer from the activity's account to `account`
#[utoipa::path(
    post,
    path = "/api/v1/transfers",
    tag = "transfers",
    security(("bearer_auth" = [])),
    request_body = CreateTransferRequest,
    responses(
        (status = 201, description = "Transfer recorded successfully", body = ApiResponse<TransferResponse>),
        (status = 400, description = "Invalid request or foreign account", body = crate::schemas::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_transfer(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(request): ValidatedJson<CreateTransferRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransferResponse>>), ApiError> {
    trace!("Entering create_transfer for user {}", user.id);
    let new_activity = request.activity.into_new_activity(&user)?;

    let recorded =
        ledger::activities::record_transfer(&state.db, user.id, new_activity, request.account)
            .await
            .map_err(ledger_error)?;

    info!(
        "Transfer {} recorded for user {} from account {} to account {}",
        recorded.record.id, user.id, recorded.activity.account_id, recorded.record.to_account_id
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            TransferResponse::from(recorded),
            "Transfer recorded successfully",
        )),
    ))
}
