//! Users and their API tokens.

use crate::validation::normalize_username;
use crate::{LedgerError, Result};
use chrono::Utc;
use model::entities::{auth_token, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Creates an active user. Usernames are unique.
#[instrument(skip(conn))]
pub async fn create_user<C: ConnectionTrait>(conn: &C, username: &str) -> Result<user::Model> {
    let username = normalize_username(username)?;
    if find_by_username(conn, &username).await?.is_some() {
        warn!("Username {} is already taken", username);
        return Err(LedgerError::validation(
            "username",
            "A user with that username already exists.",
        ));
    }

    let user = user::ActiveModel {
        username: Set(username),
        is_active: Set(true),
        date_joined: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    info!("User created with ID: {}, username: {}", user.id, user.username);
    Ok(user)
}

pub async fn find_by_username<C: ConnectionTrait>(conn: &C, username: &str) -> Result<Option<user::Model>> {
    Ok(user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(conn)
        .await?)
}

/// Returns the user's token, creating one on first use.
#[instrument(skip(conn))]
pub async fn issue_token<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<auth_token::Model> {
    if let Some(token) = auth_token::Entity::find()
        .filter(auth_token::Column::UserId.eq(user_id))
        .one(conn)
        .await?
    {
        debug!("Reusing existing token for user {}", user_id);
        return Ok(token);
    }

    let token = auth_token::ActiveModel {
        key: Set(Uuid::new_v4().simple().to_string()),
        user_id: Set(user_id),
        created: Set(Utc::now()),
    }
    .insert(conn)
    .await?;
    info!("Issued a new token for user {}", user_id);
    Ok(token)
}

/// Resolves a token key to its user. Inactive users are returned as well;
/// refusing them is up to the caller.
#[instrument(skip_all)]
pub async fn authenticate<C: ConnectionTrait>(conn: &C, key: &str) -> Result<Option<user::Model>> {
    let found = auth_token::Entity::find_by_id(key.to_string())
        .find_also_related(user::Entity)
        .one(conn)
        .await?;
    Ok(found.and_then(|(_, user)| user))
}

/// Activates or deactivates a user. Existing tokens are kept.
#[instrument(skip(conn))]
pub async fn set_active<C: ConnectionTrait>(conn: &C, user_id: i32, is_active: bool) -> Result<user::Model> {
    let user = user::Entity::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or(LedgerError::NotFound {
            entity: "user",
            id: user_id,
        })?;
    let mut active: user::ActiveModel = user.into();
    active.is_active = Set(is_active);
    let user = active.update(conn).await?;
    info!("User {} is_active set to {}", user.id, user.is_active);
    Ok(user)
}
