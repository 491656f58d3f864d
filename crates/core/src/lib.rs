//! `pressroom-core`: editor domain building blocks.
//!
//! Pure domain primitives shared by the catalog and editor crates. Nothing in
//! here performs IO.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ArticleId, Shortcode, TypeId, VersionId};
pub use value_object::ValueObject;
