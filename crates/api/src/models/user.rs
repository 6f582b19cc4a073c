//! User domain types.
//!
//! Users are identified by their normalized email and authenticate API
//! requests with a per-user token.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use catalog_core::{Email, UserId};

/// A stored user (domain type).
#[derive(Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Lowercased email, the identity key.
    pub email: Email,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Display name, may be empty.
    pub name: String,
    /// Inactive users cannot authenticate.
    pub is_active: bool,
    /// Staff users may manage other accounts.
    pub is_staff: bool,
    /// Superusers hold every permission.
    pub is_superuser: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("name", &self.name)
            .field("is_active", &self.is_active)
            .field("is_staff", &self.is_staff)
            .field("is_superuser", &self.is_superuser)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.email)
    }
}

/// A user ready to be inserted.
///
/// Built by the auth service after the email is normalized and the password
/// hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: String,
    pub name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Changes a user may make to their own account.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    /// Returns true if nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.password_hash.is_none()
    }
}

/// An API token bound to a single user.
#[derive(Debug, Clone)]
pub struct AuthToken {
    /// 40-character lowercase hex key.
    pub key: String,
    /// Owner of the token.
    pub user_id: UserId,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
}

/// The authenticated identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

/// Profile returned by the `me` endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserProfile {
    pub email: Email,
    pub name: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}
