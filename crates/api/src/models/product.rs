//! Product domain types and their client representations.
//!
//! Products are returned in one of two shapes: the [`ProductSummary`] used by
//! list, create, and update, and the [`ProductDetail`] used when a single
//! product is retrieved. [`Representation`] selects between them.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{ProductId, UserId};

use super::validation::{ValidationError, not_null, present, required_text, text};

/// A product owned by exactly one user.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    /// Set at creation, never changed.
    pub owner: UserId,
    pub code: String,
    pub description: String,
    /// Picture URL.
    pub picture: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl Product {
    /// The editable fields of this product.
    #[must_use]
    pub fn fields(&self) -> ProductFields {
        ProductFields {
            code: self.code.clone(),
            description: self.description.clone(),
            picture: self.picture.clone(),
        }
    }

    /// Render this product in the requested shape.
    #[must_use]
    pub fn represent(&self, representation: Representation) -> ProductView {
        let summary = ProductSummary::from(self);
        match representation {
            Representation::Summary => ProductView::Summary(summary),
            Representation::Detail => ProductView::Detail(ProductDetail {
                summary,
                owner: self.owner,
                created_at: self.created_at,
                updated_at: self.updated_at,
            }),
        }
    }
}

/// Validated, editable product fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub code: String,
    pub description: String,
    pub picture: String,
}

/// Product payload as sent by clients.
///
/// Used for create and full update (every field required) and for partial
/// update (only supplied fields applied). Owner fields are ignored. An
/// explicit `null` is kept apart from a missing field and always rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    #[serde(default, deserialize_with = "present")]
    pub code: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub picture: Option<Option<String>>,
}

impl ProductInput {
    /// Validate a complete set of fields.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any field is missing, null, blank, or too
    /// long.
    pub fn into_fields(self) -> Result<ProductFields, ValidationError> {
        Ok(ProductFields {
            code: required("code", self.code)?,
            description: required("description", self.description)?,
            picture: required("picture", self.picture)?,
        })
    }

    /// Apply the supplied fields on top of `current`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a supplied field is null, blank, or too
    /// long.
    pub fn merge_into(self, current: ProductFields) -> Result<ProductFields, ValidationError> {
        Ok(ProductFields {
            code: merge("code", self.code, current.code)?,
            description: merge("description", self.description, current.description)?,
            picture: merge("picture", self.picture, current.picture)?,
        })
    }
}

fn required(field: &'static str, value: Option<Option<String>>) -> Result<String, ValidationError> {
    required_text(field, not_null(field, value)?)
}

fn merge(
    field: &'static str,
    supplied: Option<Option<String>>,
    current: String,
) -> Result<String, ValidationError> {
    not_null(field, supplied)?.map_or(Ok(current), |value| text(field, &value))
}

/// Which shape to render a product in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// Fields shown in listings.
    Summary,
    /// Summary plus ownership and timestamps.
    Detail,
}

/// Product fields shown in listings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductSummary {
    pub id: ProductId,
    pub code: String,
    pub description: String,
    pub picture: String,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            code: product.code.clone(),
            description: product.description.clone(),
            picture: product.picture.clone(),
        }
    }
}

/// Product fields shown when a single product is retrieved.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub summary: ProductSummary,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product rendered in either shape.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ProductView {
    Summary(ProductSummary),
    Detail(ProductDetail),
}
