//! Ownership guard.
//!
//! Any row referenced by id in a write request must belong to the acting
//! user. This is the only authorization rule beyond being authenticated.

use crate::{LedgerError, Result};
use model::entities::{account, activity, budget, profile};
use sea_orm::{ConnectionTrait, EntityTrait, PrimaryKeyTrait};
use tracing::{trace, warn};

/// A row that belongs to exactly one user.
pub trait Owned {
    /// Name used in error messages.
    const ENTITY: &'static str;

    fn id(&self) -> i32;
    fn owner_id(&self) -> i32;
}

macro_rules! impl_owned {
    ($module:ident, $name:literal) => {
        impl Owned for $module::Model {
            const ENTITY: &'static str = $name;

            fn id(&self) -> i32 {
                self.id
            }

            fn owner_id(&self) -> i32 {
                self.user_id
            }
        }
    };
}

impl_owned!(profile, "profile");
impl_owned!(account, "account");
impl_owned!(budget, "budget");
impl_owned!(activity, "activity");

/// Fails with [`LedgerError::OwnershipMismatch`] when `entity` is not owned by `user_id`.
pub fn check_user<T: Owned>(entity: &T, user_id: i32) -> Result<()> {
    if entity.owner_id() != user_id {
        warn!(
            "User {} referenced {} {} owned by user {}",
            user_id,
            T::ENTITY,
            entity.id(),
            entity.owner_id()
        );
        return Err(LedgerError::OwnershipMismatch {
            entity: T::ENTITY,
            id: entity.id(),
        });
    }
    Ok(())
}

/// Loads a referenced row and runs [`check_user`] on it.
pub async fn load_owned<E, C>(conn: &C, id: i32, user_id: i32) -> Result<E::Model>
where
    E: EntityTrait,
    E::Model: Owned,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    trace!("Loading {} {} for user {}", <E::Model as Owned>::ENTITY, id, user_id);
    let model = E::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(LedgerError::NotFound {
            entity: <E::Model as Owned>::ENTITY,
            id,
        })?;
    check_user(&model, user_id)?;
    Ok(model)
}
