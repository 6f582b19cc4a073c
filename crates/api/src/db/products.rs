//! `PostgreSQL` queries for products.
//!
//! Every statement filters on `user_id`, so a product owned by someone else
//! behaves exactly like a missing one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use catalog_core::{ProductId, UserId};

use super::{PgStore, ProductStore, RepositoryError};
use crate::models::{Product, ProductFields};

/// Internal row type for `PostgreSQL` product queries.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    user_id: i32,
    code: String,
    description: String,
    picture: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            owner: UserId::new(row.user_id),
            code: row.code,
            description: row.description,
            picture: row.picture,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list_products(&self, owner: UserId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, user_id, code, description, picture, created_at, updated_at
            FROM catalog.product
            WHERE user_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(owner)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get_product(
        &self,
        owner: UserId,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, user_id, code, description, picture, created_at, updated_at
            FROM catalog.product
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Product::from))
    }

    async fn insert_product(
        &self,
        owner: UserId,
        fields: &ProductFields,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO catalog.product (user_id, code, description, picture)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, code, description, picture, created_at, updated_at
            ",
        )
        .bind(owner)
        .bind(&fields.code)
        .bind(&fields.description)
        .bind(&fields.picture)
        .fetch_one(self.pool())
        .await?;

        Ok(row.into())
    }

    async fn update_product(
        &self,
        owner: UserId,
        id: ProductId,
        fields: &ProductFields,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE catalog.product
            SET code = $3, description = $4, picture = $5, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, code, description, picture, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(owner)
        .bind(&fields.code)
        .bind(&fields.description)
        .bind(&fields.picture)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Product::from))
    }

    async fn delete_product(&self, owner: UserId, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM catalog.product
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(owner)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
