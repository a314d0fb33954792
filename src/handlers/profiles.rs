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
use model::entities::profile::{self, Currency};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a profile
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateProfileRequest {
    /// Defaults to CZK
    #[serde(default)]
    pub currency: Currency,
    /// Owning user; defaults to the caller and must match it when given
    pub user: Option<i32>,
}

/// Profile response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: i32,
    pub currency: Currency,
    pub created: DateTime<Utc>,
    pub user: i32,
}

impl From<profile::Model> for ProfileResponse {
    fn from(model: profile::Model) -> Self {
        Self {
            id: model.id,
            currency: model.currency,
            created: model.created,
            user: model.user_id,
        }
    }
}

/// List the caller's profiles
#[utoipa::path(
    get,
    path = "/api/v1/profiles",
    tag = "profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profiles retrieved successfully", body = ApiResponse<Vec<ProfileResponse>>),
        (status = 401, description = "Not authenticated", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_profiles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<ProfileResponse>>>, ApiError> {
    trace!("Entering list_profiles for user {}", user.id);

    let profiles = ledger::profiles::list_profiles(&state.db, user.id)
        .await
        .map_err(|e| {
            error!("Failed to list profiles for user {}: {}", user.id, e);
            ledger_error(e)
        })?;

    debug!("Returning {} profiles", profiles.len());
    Ok(Json(ApiResponse::new(
        profiles.into_iter().map(ProfileResponse::from).collect(),
        "Profiles retrieved successfully",
    )))
}

/// Create a profile
#[utoipa::path(
    post,
    path = "/api/v1/profiles",
    tag = "profiles",
    security(("bearer_auth" = [])),
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created successfully", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(request): ValidatedJson<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProfileResponse>>), ApiError> {
    trace!("Entering create_profile for user {}", user.id);
    check_body_user(request.user, &user)?;

    let profile = ledger::profiles::create_profile(&state.db, user.id, request.currency)
        .await
        .map_err(ledger_error)?;

    info!("Profile {} created for user {}", profile.id, user.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            ProfileResponse::from(profile),
            "Profile created successfully",
        )),
    ))
}
