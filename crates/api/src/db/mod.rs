//! Storage for users, tokens, tags, and products.
//!
//! Handlers never touch a global store. The store is injected through
//! [`AppState`](crate::state::AppState) as an `Arc<dyn Store>`, with two
//! implementations:
//!
//! - [`PgStore`] - `PostgreSQL` via sqlx (production)
//! - [`MemoryStore`] - in-process tables (tests and local demos)
//!
//! # Ownership
//!
//! Every tag and product operation takes the owner's [`UserId`] and only
//! ever reads or writes rows owned by it. A row owned by someone else is
//! indistinguishable from a missing row.
//!
//! # Database: `catalog`
//!
//! ## Tables
//!
//! - `app_user` - Email-identified accounts with staff/superuser flags
//! - `auth_token` - One API token per user
//! - `tag` - User-owned tags
//! - `product` - User-owned products
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p catalog-cli -- migrate
//! ```

pub mod memory;
pub mod products;
pub mod tags;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use catalog_core::{Email, ProductId, UserId};

use crate::models::{AuthToken, NewUser, Product, ProductFields, Tag, TagFields, User, UserChanges};

pub use memory::MemoryStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// User accounts and their API tokens.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user.
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken.
    async fn insert_user(&self, user: &NewUser) -> Result<User, RepositoryError>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    async fn get_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Apply `changes` to a user.
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    async fn update_user(&self, id: UserId, changes: &UserChanges) -> Result<User, RepositoryError>;

    /// Return the user's token, storing `candidate_key` if they have none yet.
    async fn get_or_create_token(
        &self,
        user_id: UserId,
        candidate_key: &str,
    ) -> Result<AuthToken, RepositoryError>;

    async fn get_user_by_token(&self, key: &str) -> Result<Option<User>, RepositoryError>;
}

/// Tags, always scoped to an owner.
#[async_trait]
pub trait TagStore: Send + Sync {
    /// The owner's tags by name descending in byte order (uppercase sorts
    /// before lowercase), ties in insertion order.
    async fn list_tags(&self, owner: UserId) -> Result<Vec<Tag>, RepositoryError>;

    async fn insert_tag(&self, owner: UserId, fields: &TagFields) -> Result<Tag, RepositoryError>;
}

/// Products, always scoped to an owner.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// The owner's products in insertion order.
    async fn list_products(&self, owner: UserId) -> Result<Vec<Product>, RepositoryError>;

    async fn get_product(
        &self,
        owner: UserId,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError>;

    async fn insert_product(
        &self,
        owner: UserId,
        fields: &ProductFields,
    ) -> Result<Product, RepositoryError>;

    /// Replace the editable fields. `None` if the owner has no such product.
    async fn update_product(
        &self,
        owner: UserId,
        id: ProductId,
        fields: &ProductFields,
    ) -> Result<Option<Product>, RepositoryError>;

    /// Returns `true` if a product was deleted.
    async fn delete_product(&self, owner: UserId, id: ProductId) -> Result<bool, RepositoryError>;
}

/// Everything the API needs from storage.
#[async_trait]
pub trait Store: UserStore + TagStore + ProductStore {
    /// Check the store can serve requests.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique violation to `Conflict`, everything else to `Database`.
fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
