//! Type selection: the only write path for a version's classification.

use std::sync::Arc;

use pressroom_catalog::TypeCatalog;

use super::entity::{Classification, VersionEntity, VersionRecord};

/// Result of applying a type selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The type was found; `type_name` is the label now on the version.
    Resolved { type_name: String },
    /// The type is missing from the table. The id was written anyway and the
    /// previous display name kept.
    UnknownType { kept_type_name: String },
}

/// Backs the editor's type-selection control.
///
/// The selector resolves display names from the same table the control lists
/// types from, and writes id and name together. No other component resolves
/// type names.
#[derive(Clone)]
pub struct TypeSelector {
    types: Arc<dyn TypeCatalog>,
}

impl core::fmt::Debug for TypeSelector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeSelector").finish_non_exhaustive()
    }
}

impl TypeSelector {
    pub fn new(types: Arc<dyn TypeCatalog>) -> Self {
        Self { types }
    }

    /// Open `record` in the editor with its display name resolved from the table.
    ///
    /// A type missing from the table keeps the name stored on the record.
    pub fn load(&self, mut record: VersionRecord) -> VersionEntity {
        match self.types.display_name(&record.type_id) {
            Some(name) => record.type_name = name.to_owned(),
            None => tracing::warn!(
                version_id = %record.id,
                type_id = %record.type_id,
                "loaded type missing from classification table; keeping stored display name"
            ),
        }
        VersionEntity::load(record)
    }

    /// Apply the user's selection to `version`.
    ///
    /// The selection replaces the whole classification: a shortcode left over
    /// from the previous type does not survive unless it is selected again.
    pub fn select(&self, version: &VersionEntity, selection: Classification) -> SelectionOutcome {
        let resolved = self
            .types
            .display_name(&selection.type_id)
            .map(str::to_owned);

        match resolved {
            Some(type_name) => {
                tracing::debug!(
                    version_id = %version.id(),
                    classification = %selection,
                    type_name = %type_name,
                    "type selected"
                );
                version.write_classification(selection, Some(type_name.clone()));
                SelectionOutcome::Resolved { type_name }
            }
            None => {
                tracing::warn!(
                    version_id = %version.id(),
                    type_id = %selection.type_id,
                    "selected type missing from classification table; keeping previous display name"
                );
                version.write_classification(selection, None);
                SelectionOutcome::UnknownType {
                    kept_type_name: version.type_name(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressroom_catalog::{TypeDescriptor, TypeTable};
    use pressroom_core::{ArticleId, Shortcode, TypeId, VersionId};

    fn type_id(s: &str) -> TypeId {
        TypeId::new(s).unwrap()
    }

    fn selector() -> TypeSelector {
        let table = TypeTable::new([
            TypeDescriptor::new(type_id("A"), "Type A", true),
            TypeDescriptor::new(type_id("B"), "Type B", false),
            TypeDescriptor::new(type_id("tech-laptop"), "Laptop", true),
        ])
        .unwrap();
        TypeSelector::new(Arc::new(table))
    }

    fn version_of_a() -> VersionEntity {
        VersionEntity::load(VersionRecord::new(
            VersionId::new(),
            ArticleId::new(),
            "Review",
            type_id("A"),
            "Type A",
            None,
        ))
    }

    #[test]
    fn selection_updates_id_and_name_together() {
        let version = version_of_a();
        let sub = version.subscribe_classification();

        let outcome = selector().select(&version, Classification::of_type(type_id("B")));

        assert_eq!(
            outcome,
            SelectionOutcome::Resolved {
                type_name: "Type B".into()
            }
        );
        // The notification is already pending and the record already carries
        // both new values: there is no point where B is paired with A's name.
        assert!(sub.has_changed());
        let snapshot = version.snapshot();
        assert_eq!(snapshot.type_id, type_id("B"));
        assert_eq!(snapshot.type_name, "Type B");
    }

    #[test]
    fn unknown_type_keeps_name_but_writes_id() {
        let version = version_of_a();

        let outcome = selector().select(&version, Classification::of_type(type_id("Z")));

        assert_eq!(
            outcome,
            SelectionOutcome::UnknownType {
                kept_type_name: "Type A".into()
            }
        );
        let snapshot = version.snapshot();
        assert_eq!(snapshot.type_id, type_id("Z"));
        assert_eq!(snapshot.type_name, "Type A");
    }

    #[test]
    fn load_resolves_name_from_table() {
        let record = |type_raw: &str| {
            VersionRecord::new(
                VersionId::new(),
                ArticleId::new(),
                "Review",
                type_id(type_raw),
                "stored name",
                None,
            )
        };

        let known = selector().load(record("tech-laptop"));
        assert_eq!(known.type_name(), "Laptop");

        let unknown = selector().load(record("Z"));
        assert_eq!(unknown.type_name(), "stored name");
        assert_eq!(unknown.classification(), Classification::of_type(type_id("Z")));
    }

    #[test]
    fn selection_replaces_shortcode() {
        let version = version_of_a();
        let selector = selector();
        let code = Shortcode::new("tech-123").unwrap();

        selector.select(
            &version,
            Classification::new(type_id("tech-laptop"), Some(code.clone())),
        );
        assert_eq!(version.snapshot().shortcode, Some(code));

        selector.select(&version, Classification::of_type(type_id("A")));
        assert_eq!(version.snapshot().shortcode, None);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: after any selection sequence the name always belongs to the
            /// last known type that was selected.
            #[test]
            fn name_tracks_last_known_selection(picks in proptest::collection::vec(0usize..4, 1..20)) {
                let ids = ["A", "B", "tech-laptop", "unknown"];
                let names = ["Type A", "Type B", "Laptop"];
                let version = version_of_a();
                let selector = selector();
                let mut expected_name = "Type A";

                for pick in picks {
                    selector.select(&version, Classification::of_type(type_id(ids[pick])));
                    if pick < names.len() {
                        expected_name = names[pick];
                    }
                    let snapshot = version.snapshot();
                    prop_assert_eq!(snapshot.type_id.as_str(), ids[pick]);
                    prop_assert_eq!(snapshot.type_name.as_str(), expected_name);
                }
            }
        }
    }
}
