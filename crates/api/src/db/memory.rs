//! In-process store.
//!
//! Backs the router tests and `CATALOG_STORE=memory`. Rows live in insertion
//! order behind a single `RwLock`; IDs are assigned sequentially from 1.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use catalog_core::{Email, ProductId, TagId, UserId};

use super::{ProductStore, RepositoryError, Store, TagStore, UserStore};
use crate::models::{AuthToken, NewUser, Product, ProductFields, Tag, TagFields, User, UserChanges};

/// Store that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    tokens: Vec<AuthToken>,
    tags: Vec<Tag>,
    products: Vec<Product>,
    last_user_id: i32,
    last_tag_id: i32,
    last_product_id: i32,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        tables.last_user_id += 1;
        let now = Utc::now();
        let created = User {
            id: UserId::new(tables.last_user_id),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            name: user.name.clone(),
            is_active: true,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| &u.email == email).cloned())
    }

    async fn update_user(&self, id: UserId, changes: &UserChanges) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepositoryError::NotFound)?;

        if let Some(name) = &changes.name {
            user.name.clone_from(name);
        }
        if let Some(hash) = &changes.password_hash {
            user.password_hash.clone_from(hash);
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn get_or_create_token(
        &self,
        user_id: UserId,
        candidate_key: &str,
    ) -> Result<AuthToken, RepositoryError> {
        let mut tables = self.tables.write().await;
        if let Some(token) = tables.tokens.iter().find(|t| t.user_id == user_id) {
            return Ok(token.clone());
        }
        if tables.tokens.iter().any(|t| t.key == candidate_key) {
            return Err(RepositoryError::Conflict("token already exists".to_owned()));
        }

        let token = AuthToken {
            key: candidate_key.to_owned(),
            user_id,
            created_at: Utc::now(),
        };
        tables.tokens.push(token.clone());
        Ok(token)
    }

    async fn get_user_by_token(&self, key: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        let Some(token) = tables.tokens.iter().find(|t| t.key == key) else {
            return Ok(None);
        };
        Ok(tables.users.iter().find(|u| u.id == token.user_id).cloned())
    }
}

#[async_trait]
impl TagStore for MemoryStore {
    async fn list_tags(&self, owner: UserId) -> Result<Vec<Tag>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables
            .tags
            .iter()
            .filter(|t| t.owner == owner)
            .cloned()
            .collect();
        // Stable sort keeps insertion order among equal names
        tags.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(tags)
    }

    async fn insert_tag(&self, owner: UserId, fields: &TagFields) -> Result<Tag, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.last_tag_id += 1;
        let now = Utc::now();
        let tag = Tag {
            id: TagId::new(tables.last_tag_id),
            owner,
            name: fields.name.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.tags.push(tag.clone());
        Ok(tag)
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self, owner: UserId) -> Result<Vec<Product>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .filter(|p| p.owner == owner)
            .cloned()
            .collect())
    }

    async fn get_product(
        &self,
        owner: UserId,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .find(|p| p.id == id && p.owner == owner)
            .cloned())
    }

    async fn insert_product(
        &self,
        owner: UserId,
        fields: &ProductFields,
    ) -> Result<Product, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.last_product_id += 1;
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(tables.last_product_id),
            owner,
            code: fields.code.clone(),
            description: fields.description.clone(),
            picture: fields.picture.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        owner: UserId,
        id: ProductId,
        fields: &ProductFields,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(product) = tables
            .products
            .iter_mut()
            .find(|p| p.id == id && p.owner == owner)
        else {
            return Ok(None);
        };

        product.code.clone_from(&fields.code);
        product.description.clone_from(&fields.description);
        product.picture.clone_from(&fields.picture);
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, owner: UserId, id: ProductId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.products.len();
        tables.products.retain(|p| !(p.id == id && p.owner == owner));
        Ok(tables.products.len() < before)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
