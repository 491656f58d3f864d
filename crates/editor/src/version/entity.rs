//! The article version being edited.

use std::str::FromStr;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use pressroom_catalog::OfferKey;
use pressroom_core::{ArticleId, DomainError, Entity, Shortcode, TypeId, ValueObject, VersionId};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// The pair that decides whether offers apply and which key to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub type_id: TypeId,
    #[serde(default)]
    pub shortcode: Option<Shortcode>,
}

impl ValueObject for Classification {}

impl Classification {
    pub fn new(type_id: TypeId, shortcode: Option<Shortcode>) -> Self {
        Self { type_id, shortcode }
    }

    pub fn of_type(type_id: TypeId) -> Self {
        Self::new(type_id, None)
    }

    /// Cache/fetch key: the shortcode when present, else the type id.
    pub fn offer_key(&self) -> OfferKey {
        OfferKey::derive(&self.type_id, self.shortcode.as_ref())
    }
}

impl core::fmt::Display for Classification {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.shortcode {
            Some(code) => write!(f, "{}:{}", self.type_id, code),
            None => write!(f, "{}", self.type_id),
        }
    }
}

/// Parses `type_id` or `type_id:shortcode`.
impl FromStr for Classification {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((type_id, shortcode)) => Ok(Self::new(
                TypeId::new(type_id)?,
                Some(Shortcode::new(shortcode)?),
            )),
            None => Ok(Self::of_type(TypeId::new(s)?)),
        }
    }
}

/// Plain data of an article version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub id: VersionId,
    pub article_id: ArticleId,
    pub title: String,
    pub type_id: TypeId,
    /// Display label for `type_id`. Never read by offer logic.
    pub type_name: String,
    #[serde(default)]
    pub shortcode: Option<Shortcode>,
}

impl VersionRecord {
    pub fn new(
        id: VersionId,
        article_id: ArticleId,
        title: impl Into<String>,
        type_id: TypeId,
        type_name: impl Into<String>,
        shortcode: Option<Shortcode>,
    ) -> Self {
        Self {
            id,
            article_id,
            title: title.into(),
            type_id,
            type_name: type_name.into(),
            shortcode,
        }
    }

    pub fn classification(&self) -> Classification {
        Classification::new(self.type_id.clone(), self.shortcode.clone())
    }
}

impl Entity for VersionRecord {
    type Id = VersionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug)]
struct VersionInner {
    record: RwLock<VersionRecord>,
    classification: watch::Sender<Classification>,
}

/// Shared, mutable version owned by the editor page.
///
/// Cloning yields another handle to the same version. When the last handle is
/// dropped the editor session for this version is over and every
/// [`ClassificationSubscription`] reports closure.
#[derive(Debug, Clone)]
pub struct VersionEntity {
    inner: Arc<VersionInner>,
}

impl VersionEntity {
    /// Load a version into the editor.
    pub fn load(record: VersionRecord) -> Self {
        let (classification, _) = watch::channel(record.classification());
        Self {
            inner: Arc::new(VersionInner {
                record: RwLock::new(record),
                classification,
            }),
        }
    }

    pub fn id(&self) -> VersionId {
        *self.read().id()
    }

    /// Copy of the whole record.
    pub fn snapshot(&self) -> VersionRecord {
        self.read().clone()
    }

    pub fn classification(&self) -> Classification {
        self.inner.classification.borrow().clone()
    }

    pub fn type_name(&self) -> String {
        self.read().type_name.clone()
    }

    /// Subscribe to the classification path only.
    ///
    /// The subscription starts with the current classification marked as seen.
    pub fn subscribe_classification(&self) -> ClassificationSubscription {
        ClassificationSubscription {
            receiver: self.inner.classification.subscribe(),
        }
    }

    /// Edit the title. Does not touch the classification.
    pub fn set_title(&self, title: impl Into<String>) {
        self.write().title = title.into();
    }

    /// Write a new classification and, when known, its display name.
    ///
    /// Both fields change under one write lock and observers are notified
    /// before the lock is released, so nobody can see the new type paired with
    /// the old name. Observers are only notified when the classification
    /// actually differs.
    pub(crate) fn write_classification(
        &self,
        classification: Classification,
        type_name: Option<String>,
    ) -> bool {
        let mut record = self.write();
        record.type_id = classification.type_id.clone();
        record.shortcode = classification.shortcode.clone();
        if let Some(name) = type_name {
            record.type_name = name;
        }

        self.inner.classification.send_if_modified(|current| {
            if *current == classification {
                false
            } else {
                *current = classification;
                true
            }
        })
    }

    // A poisoned lock only means a writer panicked mid-update; the record is
    // plain data, so keep serving it.
    fn read(&self) -> RwLockReadGuard<'_, VersionRecord> {
        self.inner
            .record
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, VersionRecord> {
        self.inner
            .record
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A subscription to a version's classification.
///
/// Fires only when the classification changes by equality; edits to other
/// fields of the version are invisible here.
#[derive(Debug)]
pub struct ClassificationSubscription {
    receiver: watch::Receiver<Classification>,
}

impl ClassificationSubscription {
    /// Current classification (marks it as seen).
    pub fn current(&mut self) -> Classification {
        self.receiver.borrow_and_update().clone()
    }

    /// Wait for the next classification change.
    ///
    /// Returns `None` once the version entity has been dropped.
    pub async fn changed(&mut self) -> Option<Classification> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Whether a change is waiting to be observed.
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }
}
