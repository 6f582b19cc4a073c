//! Tag domain types.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{TagId, UserId};

use super::validation::{ValidationError, not_null, present, required_text};

/// A tag owned by exactly one user.
#[derive(Debug, Clone)]
pub struct Tag {
    pub id: TagId,
    /// Set at creation, never changed.
    pub owner: UserId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validated, editable tag fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFields {
    pub name: String,
}

/// Tag payload as sent by clients.
///
/// Any owner field in the body is ignored; ownership comes from the token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagInput {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
}

impl TagInput {
    /// Validate into storable fields.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `name` is missing, null, blank, or too
    /// long.
    pub fn validate(self) -> Result<TagFields, ValidationError> {
        Ok(TagFields {
            name: required_text("name", not_null("name", self.name)?)?,
        })
    }
}

/// Tag representation returned to clients.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagView {
    pub id: TagId,
    pub name: String,
}

impl From<&Tag> for TagView {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
        }
    }
}
