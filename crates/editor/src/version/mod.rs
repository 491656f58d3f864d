//! Everything owned by an article version in the editor.
//!
//! The offer store lives here rather than in a shared utilities area: it only
//! ever observes a [`VersionEntity`].

pub mod entity;
pub mod offers;
pub mod selection;

pub use entity::{Classification, ClassificationSubscription, VersionEntity, VersionRecord};
pub use offers::{OfferState, OfferStore, OfferStoreConfig, OfferStoreHandle, OfferView};
pub use selection::{SelectionOutcome, TypeSelector};
