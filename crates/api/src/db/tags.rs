//! `PostgreSQL` queries for tags.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use catalog_core::{TagId, UserId};

use super::{PgStore, RepositoryError, TagStore};
use crate::models::{Tag, TagFields};

/// Internal row type for `PostgreSQL` tag queries.
#[derive(sqlx::FromRow)]
struct TagRow {
    id: i32,
    user_id: i32,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Self {
            id: TagId::new(row.id),
            owner: UserId::new(row.user_id),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl TagStore for PgStore {
    async fn list_tags(&self, owner: UserId) -> Result<Vec<Tag>, RepositoryError> {
        let rows = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT id, user_id, name, created_at, updated_at
            FROM catalog.tag
            WHERE user_id = $1
            ORDER BY name COLLATE "C" DESC, id ASC
            "#,
        )
        .bind(owner)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn insert_tag(&self, owner: UserId, fields: &TagFields) -> Result<Tag, RepositoryError> {
        let row = sqlx::query_as::<_, TagRow>(
            r"
            INSERT INTO catalog.tag (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name, created_at, updated_at
            ",
        )
        .bind(owner)
        .bind(&fields.name)
        .fetch_one(self.pool())
        .await?;

        Ok(row.into())
    }
}
