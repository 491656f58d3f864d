//! Type classification table.
//!
//! Maps a type identifier to its display name and to whether its family
//! carries catalog offers. Which families do is data supplied by whoever
//! builds the table; nothing here hard-codes membership.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use pressroom_core::TypeId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of the classification table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub id: TypeId,
    pub name: String,
    #[serde(default)]
    pub supports_offers: bool,
}

impl TypeDescriptor {
    pub fn new(id: TypeId, name: impl Into<String>, supports_offers: bool) -> Self {
        Self {
            id,
            name: name.into(),
            supports_offers,
        }
    }
}

/// Synchronous lookup into the classification table.
///
/// Both the type selector (name resolution) and the offer store (applicability)
/// call this inline while handling a single change, so implementations must not
/// perform network round-trips.
pub trait TypeCatalog: Send + Sync {
    fn lookup(&self, id: &TypeId) -> Option<&TypeDescriptor>;

    fn supports_offers(&self, id: &TypeId) -> bool {
        self.lookup(id).is_some_and(|d| d.supports_offers)
    }

    fn display_name(&self, id: &TypeId) -> Option<&str> {
        self.lookup(id).map(|d| d.name.as_str())
    }
}

impl<S> TypeCatalog for Arc<S>
where
    S: TypeCatalog + ?Sized,
{
    fn lookup(&self, id: &TypeId) -> Option<&TypeDescriptor> {
        (**self).lookup(id)
    }

    fn supports_offers(&self, id: &TypeId) -> bool {
        (**self).supports_offers(id)
    }

    fn display_name(&self, id: &TypeId) -> Option<&str> {
        (**self).display_name(id)
    }
}

#[derive(Debug, Error)]
pub enum TypeTableError {
    #[error("duplicate type id in table: {0}")]
    Duplicate(TypeId),
    #[error("failed to parse type table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read type table: {0}")]
    Io(#[from] std::io::Error),
}

/// On-disk shape: `{"types": [{"id": "...", "name": "...", "supports_offers": true}]}`.
#[derive(Debug, Deserialize)]
struct TypeTableFile {
    types: Vec<TypeDescriptor>,
}

/// In-memory classification table.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    rows: HashMap<TypeId, TypeDescriptor>,
}

impl TypeTable {
    pub fn new(rows: impl IntoIterator<Item = TypeDescriptor>) -> Result<Self, TypeTableError> {
        let mut map = HashMap::new();
        for row in rows {
            if map.contains_key(&row.id) {
                return Err(TypeTableError::Duplicate(row.id));
            }
            map.insert(row.id.clone(), row);
        }
        Ok(Self { rows: map })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, TypeTableError> {
        let file: TypeTableFile = serde_json::from_str(raw)?;
        Self::new(file.types)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TypeTableError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TypeCatalog for TypeTable {
    fn lookup(&self, id: &TypeId) -> Option<&TypeDescriptor> {
        self.rows.get(id)
    }
}
