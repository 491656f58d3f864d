//! `pressroom-editor`
//!
//! **Responsibility:** keep catalog-offer state in step with the article version
//! being edited.
//!
//! This crate provides:
//! - The shared version entity and its classification subscription
//! - The type selector, the only write path for a version's classification
//! - The per-version offer store (applicability, fetch, cache, read-only view)
//! - The offer blocks that render from that view

pub mod blocks;
pub mod config;
pub mod version;

pub use config::{ConfigError, EditorConfig};
pub use version::{
    Classification, OfferState, OfferStore, OfferStoreConfig, OfferStoreHandle, OfferView,
    SelectionOutcome, TypeSelector, VersionEntity, VersionRecord,
};
