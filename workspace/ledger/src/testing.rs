//! Fixtures shared by the unit tests.

use crate::profiles::create_profile;
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use model::entities::profile::Currency;
use model::entities::{account, profile, user};
use sea_orm::{ActiveModelTrait, ConnectionTrait, ConnectOptions, Database, DatabaseConnection, Set};
use std::path::PathBuf;
use uuid::Uuid;

/// A migrated in-memory database on a single pooled connection.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    db.execute_unprepared("PRAGMA foreign_keys = ON").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// A migrated database file in the temp dir, shared by several pooled
/// connections so that transactions really overlap.
///
/// The file is removed when the returned guard is dropped.
pub async fn setup_file_db(connections: u32) -> (DatabaseConnection, TempDbFile) {
    let file = TempDbFile(std::env::temp_dir().join(format!("pocketbook-{}.db", Uuid::new_v4().simple())));
    let mut options = ConnectOptions::new(format!("sqlite://{}?mode=rwc", file.0.display()));
    options
        .max_connections(connections)
        .min_connections(connections)
        .sqlx_logging(false);
    // sqlx turns foreign keys on for every new connection.
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    (db, file)
}

pub struct TempDbFile(PathBuf);

impl Drop for TempDbFile {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

pub async fn seed_user(db: &DatabaseConnection, username: &str) -> user::Model {
    user::ActiveModel {
        username: Set(username.to_string()),
        is_active: Set(true),
        date_joined: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_profile(db: &DatabaseConnection, user_id: i32) -> profile::Model {
    create_profile(db, user_id, Currency::Czk).await.unwrap()
}

pub async fn seed_account(db: &DatabaseConnection, profile: &profile::Model, name: &str) -> account::Model {
    account::ActiveModel {
        balance_minor: Set(0),
        created: Set(Utc::now()),
        name: Set(name.to_string()),
        profile_id: Set(profile.id),
        user_id: Set(profile.user_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
