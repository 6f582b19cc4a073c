//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::ValidationError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email, name, or password payload.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Wrong password, unknown email, or inactive user.
    #[error("unable to authenticate with provided credentials")]
    InvalidCredentials,

    /// Missing, unknown, or revoked API token.
    #[error("invalid token")]
    InvalidToken,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
