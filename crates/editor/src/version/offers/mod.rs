//! Catalog offers for one article version.
//!
//! [`OfferStore::attach`] subscribes to a version's classification and owns the
//! derived state: whether offers apply, the offers for the current key, and
//! fetch progress. Consumers only ever get an [`OfferView`].

mod cache;
mod store;
mod view;

pub use store::{OfferStore, OfferStoreConfig, OfferStoreHandle};
pub use view::{OfferState, OfferView};
