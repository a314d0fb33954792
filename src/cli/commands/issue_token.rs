use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::config::connect;

/// Returns the API token key of an existing user, issuing one if they have none.
pub async fn issue_token(database_url: &str, username: &str) -> Result<String> {
    let db = connect(database_url).await?;
    let user = ledger::users::find_by_username(&db, username)
        .await?
        .ok_or_else(|| anyhow!("no user named '{username}'"))?;
    let token = ledger::users::issue_token(&db, user.id)
        .await
        .context("could not issue token")?;
    info!("Token ready for user {}", user.username);
    Ok(token.key)
}
