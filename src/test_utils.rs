use crate::config::{Settings, token_cache};
use crate::router::create_router;
use crate::schemas::AppState;
use axum::Router;
use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// A user seeded into the test database, with a ready-made auth header.
pub struct TestUser {
    pub id: i32,
    pub token: String,
}

impl TestUser {
    pub fn auth(&self) -> (HeaderName, HeaderValue) {
        (
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token)).unwrap(),
        )
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub alice: TestUser,
    pub bob: TestUser,
}

/// Create an in-memory SQLite database for testing
pub async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to connect to in-memory database");
    db.execute_unprepared("PRAGMA foreign_keys = ON")
        .await
        .expect("Failed to enable foreign keys");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

async fn seed_user(db: &DatabaseConnection, username: &str) -> TestUser {
    let user = ledger::users::create_user(db, username)
        .await
        .expect("Failed to create test user");
    let token = ledger::users::issue_token(db, user.id)
        .await
        .expect("Failed to issue test token");
    TestUser {
        id: user.id,
        token: token.key,
    }
}

/// Initialize tracing for tests with output to STDERR.
///
/// The log level is taken from RUST_LOG, defaulting to WARN.
fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// Create axum app for testing with two users, alice and bob
pub async fn setup_test_app() -> TestApp {
    let _guard = init_test_tracing();

    let db = setup_test_db().await;
    let alice = seed_user(&db, "alice").await;
    let bob = seed_user(&db, "bob").await;

    let settings = Settings::default();
    let state = AppState {
        db,
        tokens: token_cache(&settings),
    };
    let router = create_router(state.clone(), &settings);

    TestApp {
        router,
        state,
        alice,
        bob,
    }
}
