//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! catalog-cli user create -e user@example.com -p secret -n "User Name"
//! catalog-cli user create-superuser -e admin@example.com -p secret
//! catalog-cli user token -e user@example.com -p secret
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use thiserror::Error;

use catalog_api::db::PgStore;
use catalog_api::services::{AuthError, AuthService};
use catalog_core::UserId;

use super::CommandError;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a regular user.
///
/// # Returns
///
/// The ID of the created user.
pub async fn create(email: &str, password: &str, name: &str) -> Result<UserId, UserError> {
    let store = PgStore::new(super::connect().await?);

    let user = AuthService::new(&store)
        .create_user(Some(email), password, name)
        .await?;

    tracing::info!("User created successfully! ID: {}, Email: {}", user.id, user.email);
    Ok(user.id)
}

/// Create a superuser.
///
/// # Returns
///
/// The ID of the created superuser.
pub async fn create_superuser(email: &str, password: &str) -> Result<UserId, UserError> {
    let store = PgStore::new(super::connect().await?);

    let user = AuthService::new(&store)
        .create_superuser(Some(email), password)
        .await?;

    tracing::info!("Superuser created successfully! ID: {}, Email: {}", user.id, user.email);
    Ok(user.id)
}

/// Print the user's API token, issuing one on first use.
pub async fn token(email: &str, password: &str) -> Result<(), UserError> {
    let store = PgStore::new(super::connect().await?);

    let token = AuthService::new(&store).issue_token(email, password).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", token.key);
    }
    Ok(())
}
