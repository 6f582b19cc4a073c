//! Ownership-scoped access to tags and products.
//!
//! [`OwnedCatalog`] is bound to one authenticated user. Every list, create,
//! retrieve, update, and destroy goes through it, so a caller can only ever
//! see or touch their own records, and anything they create is stamped with
//! their ID regardless of what the request body says.

use thiserror::Error;

use catalog_core::{ProductId, UserId};

use crate::db::{RepositoryError, Store};
use crate::models::{Product, ProductInput, Tag, TagInput, ValidationError};

/// Errors from ownership-scoped catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request payload was invalid.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The record doesn't exist or belongs to another user.
    #[error("not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// How an update applies the supplied fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductUpdate {
    /// Replace every editable field; all are required.
    Full,
    /// Change only the fields present in the payload.
    Partial,
}

/// The catalog as seen by a single owner.
pub struct OwnedCatalog<'a> {
    store: &'a dyn Store,
    owner: UserId,
}

impl<'a> OwnedCatalog<'a> {
    /// Scope the store to `owner`.
    #[must_use]
    pub const fn new(store: &'a dyn Store, owner: UserId) -> Self {
        Self { store, owner }
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// The owner's tags, name descending.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn list_tags(&self) -> Result<Vec<Tag>, CatalogError> {
        Ok(self.store.list_tags(self.owner).await?)
    }

    /// Create a tag owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the name is missing, blank, or
    /// too long.
    pub async fn create_tag(&self, input: TagInput) -> Result<Tag, CatalogError> {
        let fields = input.validate()?;
        let tag = self.store.insert_tag(self.owner, &fields).await?;

        tracing::info!(owner = %self.owner, tag_id = %tag.id, "Tag created");
        Ok(tag)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// The owner's products in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.store.list_products(self.owner).await?)
    }

    /// Create a product owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if any field is missing, blank, or
    /// too long.
    pub async fn create_product(&self, input: ProductInput) -> Result<Product, CatalogError> {
        let fields = input.into_fields()?;
        let product = self.store.insert_product(self.owner, &fields).await?;

        tracing::info!(owner = %self.owner, product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Get one of the owner's products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product doesn't exist or is
    /// owned by someone else.
    pub async fn retrieve_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.store
            .get_product(self.owner, id)
            .await?
            .ok_or(CatalogError::NotFound)
    }

    /// Update one of the owner's products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for an invalid payload and
    /// `CatalogError::NotFound` if the product isn't the owner's.
    pub async fn update_product(
        &self,
        id: ProductId,
        input: ProductInput,
        mode: ProductUpdate,
    ) -> Result<Product, CatalogError> {
        let fields = match mode {
            ProductUpdate::Full => input.into_fields()?,
            ProductUpdate::Partial => {
                let current = self.retrieve_product(id).await?;
                input.merge_into(current.fields())?
            }
        };

        let product = self
            .store
            .update_product(self.owner, id, &fields)
            .await?
            .ok_or(CatalogError::NotFound)?;

        tracing::info!(owner = %self.owner, product_id = %product.id, ?mode, "Product updated");
        Ok(product)
    }

    /// Delete one of the owner's products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product isn't the owner's.
    pub async fn destroy_product(&self, id: ProductId) -> Result<(), CatalogError> {
        if !self.store.delete_product(self.owner, id).await? {
            return Err(CatalogError::NotFound);
        }

        tracing::info!(owner = %self.owner, product_id = %id, "Product deleted");
        Ok(())
    }
}
