use crate::Result;
use chrono::Utc;
use model::entities::profile::{self, Currency};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::{debug, info, instrument};

/// Creates a profile for `user_id`. The currency cannot be changed afterwards.
#[instrument(skip(conn))]
pub async fn create_profile<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    currency: Currency,
) -> Result<profile::Model> {
    let profile = profile::ActiveModel {
        currency: Set(currency),
        created: Set(Utc::now()),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    info!(
        "Profile created with ID: {}, currency: {:?}, user: {}",
        profile.id,
        profile.currency,
        user_id
    );
    Ok(profile)
}

/// Profiles owned by `user_id`, oldest first.
#[instrument(skip(conn))]
pub async fn list_profiles<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<Vec<profile::Model>> {
    let profiles = profile::Entity::find()
        .filter(profile::Column::UserId.eq(user_id))
        .order_by_asc(profile::Column::Id)
        .all(conn)
        .await?;
    debug!("Retrieved {} profiles for user {}", profiles.len(), user_id);
    Ok(profiles)
}
