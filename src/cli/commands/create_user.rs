use anyhow::{Context, Result};
use tracing::info;

use crate::config::connect;

/// Creates a user and returns their API token key.
pub async fn create_user(database_url: &str, username: &str) -> Result<String> {
    let db = connect(database_url).await?;
    let user = ledger::users::create_user(&db, username)
        .await
        .with_context(|| format!("could not create user '{username}'"))?;
    let token = ledger::users::issue_token(&db, user.id).await?;
    info!("Created user {} with ID {}", user.username, user.id);
    Ok(token.key)
}
