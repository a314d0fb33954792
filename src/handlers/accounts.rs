use crate::auth::{AuthUser, check_body_user};
use crate::errors::{ApiError, api_error, ledger_error};
use crate::extract::ValidatedJson;
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use ledger::accounts::NewAccount;
use model::entities::account;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a new account
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateAccountRequest {
    /// Account name, at most 32 characters
    #[validate(custom(function = "crate::validation::validate_name"))]
    pub name: String,
    /// Opening balance (default 0.00); may be negative
    #[serde(default)]
    #[schema(value_type = String, example = "0.00")]
    #[validate(custom(function = "crate::validation::validate_balance"))]
    pub balance: Decimal,
    /// Profile the account belongs to
    pub profile: i32,
    /// Owning user; defaults to the caller and must match it when given
    pub user: Option<i32>,
}

/// Account response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: i32,
    #[schema(value_type = String, example = "120.50")]
    pub balance: Decimal,
    pub created: DateTime<Utc>,
    pub name: String,
    pub profile: i32,
    pub user: i32,
}

impl From<account::Model> for AccountResponse {
    fn from(model: account::Model) -> Self {
        Self {
            id: model.id,
            balance: model.balance(),
            created: model.created,
            name: model.name,
            profile: model.profile_id,
            user: model.user_id,
        }
    }
}

/// List the caller's accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    tag = "accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Accounts retrieved successfully", body = ApiResponse<Vec<AccountResponse>>),
        (status = 401, description = "Not authenticated", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<AccountResponse>>>, ApiError> {
    trace!("Entering list_accounts for user {}", user.id);

    let accounts = ledger::accounts::list_accounts(&state.db, user.id)
        .await
        .map_err(|e| {
            error!("Failed to list accounts for user {}: {}", user.id, e);
            ledger_error(e)
        })?;

    debug!("Returning {} accounts", accounts.len());
    Ok(Json(ApiResponse::new(
        accounts.into_iter().map(AccountResponse::from).collect(),
        "Accounts retrieved successfully",
    )))
}

/// Create a new account
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "accounts",
    security(("bearer_auth" = [])),
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created successfully", body = ApiResponse<AccountResponse>),
        (status = 400, description = "Invalid request or foreign profile", body = crate::schemas::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_account(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(request): ValidatedJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), ApiError> {
    trace!("Entering create_account for user {}", user.id);
    check_body_user(request.user, &user)?;
    debug!(
        "Creating account '{}' in profile {} with balance {}",
        request.name, request.profile, request.balance
    );

    let account = ledger::accounts::create_account(
        &state.db,
        user.id,
        NewAccount {
            name: request.name,
            balance: Some(request.balance),
            profile_id: request.profile,
        },
    )
    .await
    .map_err(ledger_error)?;

    info!("Account {} created for user {}", account.id, user.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            AccountResponse::from(account),
            "Account created successfully",
        )),
    ))
}

/// Get one of the caller's accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Account retrieved successfully", body = ApiResponse<AccountResponse>),
        (status = 404, description = "Account not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    trace!("Entering get_account for account_id: {}", account_id);

    match ledger::accounts::find_account(&state.db, user.id, account_id).await {
        Ok(Some(account)) => Ok(Json(ApiResponse::new(
            AccountResponse::from(account),
            "Account retrieved successfully",
        ))),
        Ok(None) => {
            warn!("Account {} not found for user {}", account_id, user.id);
            Err(api_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Not found."))
        }
        Err(e) => {
            error!("Failed to retrieve account {}: {}", account_id, e);
            Err(ledger_error(e))
        }
    }
}
