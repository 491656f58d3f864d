//! Entity trait: records that keep their identity while their fields change.

use core::fmt::Display;
use core::hash::Hash;

/// Something identified by a stable id rather than by its contents.
///
/// An article version stays the same version while the editor rewrites its
/// classification, so anything keyed by version should key by `id()`.
pub trait Entity {
    /// Ids are small handles, copied freely into logs and map keys.
    type Id: Copy + Eq + Hash + Display;

    fn id(&self) -> &Self::Id;
}
