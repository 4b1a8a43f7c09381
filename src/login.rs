use crate::models::LoginOutcome;
use crate::storage::Database;
use tracing::{error, info};

/// Single-shot credential check. Empty fields are rejected before any query
/// is issued.
pub async fn attempt_login(db: &Database, username: &str, password: &str) -> LoginOutcome {
    if username.is_empty() || password.is_empty() {
        return LoginOutcome::InvalidInput;
    }

    match db.credentials_match(username, password).await {
        Ok(true) => {
            info!(%username, "login succeeded");
            LoginOutcome::Success {
                username: username.to_string(),
            }
        }
        Ok(false) => {
            info!(%username, "login rejected");
            LoginOutcome::Failure
        }
        Err(err) => {
            error!("login query failed: {err}");
            LoginOutcome::DatabaseError
        }
    }
}
