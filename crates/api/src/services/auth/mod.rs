//! Authentication service.
//!
//! Creates users and superusers, checks passwords, and issues the per-user
//! API tokens that every resource endpoint requires.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::RngCore;

use catalog_core::{Email, UserId};

use crate::db::{RepositoryError, Store};
use crate::models::{AuthToken, NewUser, User, UserChanges, ValidationError};
use crate::models::validation::optional_text;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 5;

/// Random bytes per token; hex encoding doubles the length.
const TOKEN_BYTES: usize = 20;

/// Authentication service.
///
/// Handles user creation, credential checks, and token management.
pub struct AuthService<'a> {
    store: &'a dyn Store,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    // =========================================================================
    // User Creation
    // =========================================================================

    /// Create a regular user.
    ///
    /// The email is lowercased before it is stored.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the email is missing or malformed or
    /// the password is too short.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn create_user(
        &self,
        email: Option<&str>,
        password: &str,
        name: &str,
    ) -> Result<User, AuthError> {
        self.insert(email, password, name, false).await
    }

    /// Create a superuser (staff and superuser flags set).
    ///
    /// # Errors
    ///
    /// Same as [`AuthService::create_user`].
    pub async fn create_superuser(
        &self,
        email: Option<&str>,
        password: &str,
    ) -> Result<User, AuthError> {
        self.insert(email, password, "", true).await
    }

    async fn insert(
        &self,
        email: Option<&str>,
        password: &str,
        name: &str,
        superuser: bool,
    ) -> Result<User, AuthError> {
        let email = Email::parse_optional(email).map_err(ValidationError::from)?;
        validate_password(password)?;
        let name = optional_text("name", name)?;

        let new_user = NewUser {
            email,
            password_hash: hash_password(password)?,
            name,
            is_staff: superuser,
            is_superuser: superuser,
        };

        let user = self
            .store
            .insert_user(&new_user)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(
            user_id = %user.id,
            is_superuser = user.is_superuser,
            "User created"
        );
        Ok(user)
    }

    // =========================================================================
    // Credentials & Tokens
    // =========================================================================

    /// Verify an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown, the
    /// password is wrong, or the user is inactive.
    pub async fn login_with_password(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .store
            .get_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active || !check_password(&user, password) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Exchange credentials for the user's API token, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` as [`AuthService::login_with_password`].
    pub async fn issue_token(&self, email: &str, password: &str) -> Result<AuthToken, AuthError> {
        let user = self.login_with_password(email, password).await?;
        let token = self
            .store
            .get_or_create_token(user.id, &generate_token_key())
            .await?;

        tracing::debug!(user_id = %user.id, "Token issued");
        Ok(token)
    }

    /// Resolve an API token to its active user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the key is unknown or the user is
    /// inactive.
    pub async fn authenticate_token(&self, key: &str) -> Result<User, AuthError> {
        let user = self
            .store
            .get_user_by_token(key)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !user.is_active {
            return Err(AuthError::InvalidToken);
        }

        Ok(user)
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the user no longer exists.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    /// Update the caller's own name and/or password.
    ///
    /// An empty name clears it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if a supplied value is invalid.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        name: Option<&str>,
        password: Option<&str>,
    ) -> Result<User, AuthError> {
        let name = name.map(|n| optional_text("name", n)).transpose()?;
        let password_hash = match password {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let changes = UserChanges {
            name,
            password_hash,
        };
        if changes.is_empty() {
            return self.get_user(user_id).await;
        }

        let user = self
            .store
            .update_user(user_id, &changes)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::InvalidToken,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}

/// Check a plaintext password against the user's stored hash.
#[must_use]
pub fn check_password(user: &User, password: &str) -> bool {
    verify_password(password, &user.password_hash).is_ok()
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::Password(format!(
            "must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Generate a random 40-character hex token key.
fn generate_token_key() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn test_create_user_with_email_successful() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        let user = auth
            .create_user(Some("jchitiva@lulobank.com"), "12345", "")
            .await
            .unwrap();

        assert_eq!(user.email.as_str(), "jchitiva@lulobank.com");
        assert!(check_password(&user, "12345"));
        assert!(!check_password(&user, "54321"));
        assert!(user.is_active);
        assert!(!user.is_staff);
        assert!(!user.is_superuser);
    }

    #[tokio::test]
    async fn test_new_user_email_normalized() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        for (i, email) in ["test@LULObank.com", "UPPER@CASE.IO", "MiXeD.Name@Example.Org"]
            .into_iter()
            .enumerate()
        {
            let user = auth.create_user(Some(email), "12345", "").await.unwrap();
            assert_eq!(user.email.as_str(), email.to_lowercase(), "case {i}");
        }
    }

    #[tokio::test]
    async fn test_new_user_invalid_email() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        for email in [None, Some(""), Some("  ")] {
            let err = auth.create_user(email, "test123", "").await.unwrap_err();
            assert!(matches!(
                err,
                AuthError::Validation(ValidationError::Email(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_password_too_short() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        let err = auth
            .create_user(Some("test@lulobank.com"), "pw", "")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::Password(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_case_insensitively() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        auth.create_user(Some("test@lulobank.com"), "12345", "")
            .await
            .unwrap();
        let err = auth
            .create_user(Some("TEST@lulobank.com"), "12345", "")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_when_super_user_is_created() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);

        let user = auth
            .create_superuser(Some("jchitiva@lulobank.com"), "test123")
            .await
            .unwrap();

        assert!(user.is_superuser);
        assert!(user.is_staff);
    }

    #[tokio::test]
    async fn test_issue_token_and_authenticate() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        let user = auth
            .create_user(Some("test@lulobank.com"), "12345", "")
            .await
            .unwrap();

        let token = auth.issue_token("Test@Lulobank.com", "12345").await.unwrap();
        assert_eq!(token.key.len(), 40);
        assert!(token.key.chars().all(|c| c.is_ascii_hexdigit()));

        let again = auth.issue_token("test@lulobank.com", "12345").await.unwrap();
        assert_eq!(again.key, token.key);

        let resolved = auth.authenticate_token(&token.key).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn test_issue_token_invalid_credentials() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        auth.create_user(Some("test@lulobank.com"), "12345", "")
            .await
            .unwrap();

        assert!(matches!(
            auth.issue_token("test@lulobank.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.issue_token("nobody@lulobank.com", "12345").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.issue_token("", "").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        assert!(matches!(
            auth.authenticate_token("deadbeef").await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_update_profile_name_and_password() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        let user = auth
            .create_user(Some("test@lulobank.com"), "12345", "Juan")
            .await
            .unwrap();

        let updated = auth
            .update_profile(user.id, Some("Juana"), Some("newpassword"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Juana");
        assert!(check_password(&updated, "newpassword"));
        assert_eq!(updated.email, user.email);
    }

    #[tokio::test]
    async fn test_update_profile_clears_name() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        let user = auth
            .create_user(Some("test@lulobank.com"), "12345", "Juan")
            .await
            .unwrap();

        let updated = auth.update_profile(user.id, Some(""), None).await.unwrap();
        assert_eq!(updated.name, "");
        assert!(check_password(&updated, "12345"));
    }

    #[tokio::test]
    async fn test_name_length_is_limited() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        let long_name = "a".repeat(256);

        assert!(matches!(
            auth.create_user(Some("test@lulobank.com"), "12345", &long_name)
                .await,
            Err(AuthError::Validation(ValidationError::TooLong { field: "name", .. }))
        ));
    }
}
