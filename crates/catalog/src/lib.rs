//! Catalog collaborators of the editor.
//!
//! Offer records, the type classification table and the catalog fetch
//! endpoint contract. The editor consumes these through the `TypeCatalog` and
//! `OfferFetcher` traits so tests can substitute in-memory versions.

pub mod fetch;
pub mod http;
pub mod offer;
pub mod types;

pub use fetch::{FetchError, InMemoryOfferFetcher, OfferFetcher};
pub use http::HttpOfferFetcher;
pub use offer::{Offer, OfferKey, Price, PricePeriod};
pub use types::{TypeCatalog, TypeDescriptor, TypeTable, TypeTableError};
