//! Field validation shared by request payloads.

use catalog_core::EmailError;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Maximum length of any free-text field.
pub const MAX_FIELD_LENGTH: usize = 255;

/// A request payload failed validation.
///
/// Only the first offending field is reported.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// A field that must be present was missing.
    #[error("{field}: this field is required")]
    Required {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A field was sent as an explicit `null`.
    #[error("{field}: this field may not be null")]
    Null {
        /// Name of the null field.
        field: &'static str,
    },

    /// A field was present but empty after trimming.
    #[error("{field}: this field may not be blank")]
    Blank {
        /// Name of the blank field.
        field: &'static str,
    },

    /// A field exceeded [`MAX_FIELD_LENGTH`].
    #[error("{field}: ensure this field has no more than {max} characters")]
    TooLong {
        /// Name of the oversized field.
        field: &'static str,
        /// Maximum allowed length.
        max: usize,
    },

    /// The email was missing or malformed.
    #[error("email: {0}")]
    Email(#[from] EmailError),

    /// The password did not meet the policy.
    #[error("password: {0}")]
    Password(String),
}

/// Deserialize a field so an explicit `null` stays distinguishable from a
/// missing one: absent is `None`, `null` is `Some(None)`.
///
/// Pair with `#[serde(default)]`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Collapse a [`present`] field, rejecting an explicit `null`.
///
/// # Errors
///
/// Returns `Null` for `Some(None)`.
pub fn not_null<T>(field: &'static str, value: Option<Option<T>>) -> Result<Option<T>, ValidationError> {
    match value {
        Some(None) => Err(ValidationError::Null { field }),
        other => Ok(other.flatten()),
    }
}

/// Validate a required text field, trimming surrounding whitespace.
///
/// # Errors
///
/// Returns `Required` for `None`, otherwise as [`text`].
pub fn required_text(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    value.map_or(Err(ValidationError::Required { field }), |v| text(field, &v))
}

/// Validate a text field that may be left empty, trimming surrounding
/// whitespace.
///
/// # Errors
///
/// Returns `TooLong` past [`MAX_FIELD_LENGTH`] characters.
pub fn optional_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > MAX_FIELD_LENGTH {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_FIELD_LENGTH,
        });
    }
    Ok(trimmed.to_owned())
}

/// Validate a supplied text field, trimming surrounding whitespace.
///
/// # Errors
///
/// Returns `Blank` if nothing is left after trimming, `TooLong` past
/// [`MAX_FIELD_LENGTH`] characters.
pub fn text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = optional_text(field, value)?;
    if trimmed.is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(trimmed)
}
