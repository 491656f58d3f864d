//! Strongly-typed identifiers used across the editor.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Identifier of an article.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(Uuid);

/// Identifier of one editable version of an article.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(Uuid);

macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a new time-ordered (UUIDv7) identifier.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_newtype!(ArticleId, "ArticleId");
impl_uuid_newtype!(VersionId, "VersionId");

/// Opaque identifier of a product/content type (e.g. `broadband-fixed`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeId(String);

/// Product shortcode carried by some type families (e.g. `tech-123`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Shortcode(String);

macro_rules! impl_label_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Build the identifier, trimming surrounding whitespace.
            ///
            /// Blank input is rejected.
            pub fn new(value: impl Into<String>) -> DomainResult<Self> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(format!("{} must not be blank", $name)));
                }
                if trimmed.len() == value.len() {
                    Ok(Self(value))
                } else {
                    Ok(Self(trimmed.to_string()))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

impl_label_newtype!(TypeId, "TypeId");
impl_label_newtype!(Shortcode, "Shortcode");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_id_trims_whitespace() {
        let id = TypeId::new("  broadband-fixed ").unwrap();
        assert_eq!(id.as_str(), "broadband-fixed");
    }

    #[test]
    fn blank_type_id_is_rejected() {
        let err = TypeId::new("   ").unwrap_err();
        assert_eq!(err, DomainError::Validation("TypeId must not be blank".into()));
    }

    #[test]
    fn shortcode_deserialization_validates() {
        let ok: Shortcode = serde_json::from_str("\"tech-123\"").unwrap();
        assert_eq!(ok.to_string(), "tech-123");

        let err = serde_json::from_str::<Shortcode>("\"\"");
        assert!(err.is_err());
    }

    #[test]
    fn version_id_parses_from_uuid_string() {
        let id = VersionId::new();
        let parsed: VersionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn version_id_rejects_garbage() {
        let err = "not-a-uuid".parse::<VersionId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(msg) if msg.starts_with("VersionId")));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any non-blank label survives construction unchanged after trimming.
            #[test]
            fn non_blank_labels_are_accepted(raw in "[ ]{0,3}[a-z0-9][a-z0-9-]{0,30}[ ]{0,3}") {
                let id = TypeId::new(raw.clone()).unwrap();
                prop_assert_eq!(id.as_str(), raw.trim());
            }
        }
    }
}
