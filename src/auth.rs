//! Token authentication.
//!
//! Every `/api/v1` route requires `Authorization: Bearer <key>`. The older
//! `Token <key>` scheme is accepted too. Resolved keys are cached for the
//! configured TTL, so deactivating a user takes effect once the entry expires.

use crate::errors::{ApiError, api_error};
use crate::schemas::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use model::entities::user;
use tracing::{debug, error, trace, warn};

/// The caller, placed in request extensions by [`require_token`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    pub is_active: bool,
}

impl From<user::Model> for AuthUser {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            is_active: model.is_active,
        }
    }
}

fn not_authenticated() -> ApiError {
    api_error(
        StatusCode::UNAUTHORIZED,
        "NOT_AUTHENTICATED",
        "Authentication credentials were not provided.",
    )
}

fn authentication_failed(message: &str) -> ApiError {
    api_error(StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILED", message)
}

/// Extracts the token key from the `Authorization` header.
///
/// An absent header or an unknown scheme counts as no credentials at all.
pub fn token_from_headers(headers: &HeaderMap) -> Result<&str, ApiError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(not_authenticated());
    };
    let value = value
        .to_str()
        .map_err(|_| authentication_failed("Invalid token header. Token string should not contain invalid characters."))?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().unwrap_or_default();
    if !scheme.eq_ignore_ascii_case("bearer") && !scheme.eq_ignore_ascii_case("token") {
        return Err(not_authenticated());
    }
    match (parts.next(), parts.next()) {
        (Some(key), None) => Ok(key),
        (None, _) => Err(authentication_failed(
            "Invalid token header. No credentials provided.",
        )),
        (Some(_), Some(_)) => Err(authentication_failed(
            "Invalid token header. Token string should not contain spaces.",
        )),
    }
}

async fn resolve(state: &AppState, key: &str) -> Result<AuthUser, ApiError> {
    if let Some(user) = state.tokens.get(key).await {
        trace!("Token cache hit for user {}", user.id);
        return Ok(user);
    }

    let user = match ledger::users::authenticate(&state.db, key).await {
        Ok(Some(user)) => AuthUser::from(user),
        Ok(None) => {
            warn!("Rejected unknown token");
            return Err(authentication_failed("Invalid token."));
        }
        Err(e) => {
            error!("Failed to look up token: {}", e);
            return Err(crate::errors::ledger_error(e));
        }
    };
    state.tokens.insert(key.to_string(), user.clone()).await;
    debug!("Authenticated user {} ({})", user.id, user.username);
    Ok(user)
}

/// Middleware guarding the API routes.
pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = token_from_headers(request.headers())?.to_string();
    let user = resolve(&state, &key).await?;
    if !user.is_active {
        warn!("Inactive user {} attempted a request", user.id);
        return Err(api_error(
            StatusCode::FORBIDDEN,
            "PERMISSION_DENIED",
            "User inactive or deleted.",
        ));
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Rejects a request body whose optional `user` field names someone other than the caller.
pub fn check_body_user(body_user: Option<i32>, caller: &AuthUser) -> Result<(), ApiError> {
    match body_user {
        Some(id) if id != caller.id => {
            warn!("User {} submitted a body for user {}", caller.id, id);
            Err(api_error(
                StatusCode::BAD_REQUEST,
                "USER_MISMATCH",
                format!("User mismatch in a foreign field: user {id}"),
            ))
        }
        _ => Ok(()),
    }
}
