//! `PostgreSQL` queries for users and API tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use catalog_core::{Email, UserId};

use super::{PgStore, RepositoryError, UserStore, conflict_on_unique};
use crate::models::{AuthToken, NewUser, User, UserChanges};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` user queries.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    password_hash: String,
    name: String,
    is_active: bool,
    is_staff: bool,
    is_superuser: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            password_hash: row.password_hash,
            name: row.name,
            is_active: row.is_active,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for `PostgreSQL` token queries.
#[derive(sqlx::FromRow)]
struct AuthTokenRow {
    key: String,
    user_id: i32,
    created_at: DateTime<Utc>,
}

impl From<AuthTokenRow> for AuthToken {
    fn from(row: AuthTokenRow) -> Self {
        Self {
            key: row.key,
            user_id: UserId::new(row.user_id),
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Queries
// =============================================================================

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO catalog.app_user (email, password_hash, name, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, name, is_active, is_staff, is_superuser,
                      created_at, updated_at
            ",
        )
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .fetch_one(self.pool())
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?;

        row.try_into()
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, password_hash, name, is_active, is_staff, is_superuser,
                   created_at, updated_at
            FROM catalog.app_user
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, password_hash, name, is_active, is_staff, is_superuser,
                   created_at, updated_at
            FROM catalog.app_user
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn update_user(&self, id: UserId, changes: &UserChanges) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE catalog.app_user
            SET name = COALESCE($2, name),
                password_hash = COALESCE($3, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, name, is_active, is_staff, is_superuser,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.password_hash.as_deref())
        .fetch_optional(self.pool())
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    async fn get_or_create_token(
        &self,
        user_id: UserId,
        candidate_key: &str,
    ) -> Result<AuthToken, RepositoryError> {
        // The no-op update makes RETURNING yield the existing row on conflict
        let row = sqlx::query_as::<_, AuthTokenRow>(
            r"
            INSERT INTO catalog.auth_token (key, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING key, user_id, created_at
            ",
        )
        .bind(candidate_key)
        .bind(user_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| conflict_on_unique(e, "token"))?;

        Ok(row.into())
    }

    async fn get_user_by_token(&self, key: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT u.id, u.email, u.password_hash, u.name, u.is_active, u.is_staff,
                   u.is_superuser, u.created_at, u.updated_at
            FROM catalog.auth_token t
            JOIN catalog.app_user u ON u.id = t.user_id
            WHERE t.key = $1
            ",
        )
        .bind(key)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}
