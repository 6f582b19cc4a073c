//! Business logic services.
//!
//! # Services
//!
//! - `auth` - User creation, password checks, and API tokens
//! - `catalog` - Ownership-scoped access to tags and products

pub mod auth;
pub mod catalog;

pub use auth::{AuthError, AuthService};
pub use catalog::{CatalogError, OwnedCatalog, ProductUpdate};
