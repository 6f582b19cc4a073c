//! Domain models for the catalog.
//!
//! These are validated domain objects, separate from database row types and
//! from the JSON shapes sent to clients.

pub mod product;
pub mod tag;
pub mod user;
pub mod validation;

pub use product::{
    Product, ProductDetail, ProductFields, ProductInput, ProductSummary, ProductView, Representation,
};
pub use tag::{Tag, TagFields, TagInput, TagView};
pub use user::{AuthToken, CurrentUser, NewUser, User, UserChanges, UserProfile};
pub use validation::ValidationError;
