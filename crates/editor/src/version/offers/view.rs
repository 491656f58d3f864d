//! Read-only offer state handed to consumers.

use pressroom_catalog::{FetchError, Offer, OfferKey};
use tokio::sync::watch;

use crate::version::entity::Classification;

/// One consistent snapshot of a version's offer state.
///
/// Snapshots are published whole, so `disabled`, `offers`, `loading` and
/// `error` always describe the same classification.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferState {
    classification: Classification,
    key: Option<OfferKey>,
    disabled: bool,
    offers: Vec<Offer>,
    loading: bool,
    error: Option<FetchError>,
}

impl OfferState {
    pub(crate) fn inapplicable(classification: Classification) -> Self {
        Self {
            classification,
            key: None,
            disabled: true,
            offers: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub(crate) fn settled(classification: Classification, key: OfferKey, offers: Vec<Offer>) -> Self {
        Self {
            classification,
            key: Some(key),
            disabled: false,
            offers,
            loading: false,
            error: None,
        }
    }

    /// A fetch is in flight; `offers` is whatever was last known for `key`.
    pub(crate) fn fetching(
        classification: Classification,
        key: OfferKey,
        last_known: Vec<Offer>,
    ) -> Self {
        Self {
            loading: true,
            ..Self::settled(classification, key, last_known)
        }
    }

    pub(crate) fn resolve(&mut self, offers: Vec<Offer>) {
        self.offers = offers;
        self.error = None;
        self.loading = false;
    }

    /// Offers are left alone: last known good data stays visible.
    pub(crate) fn reject(&mut self, error: FetchError) {
        self.error = Some(error);
        self.loading = false;
    }

    /// Classification this snapshot was computed from.
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// Offer key of the snapshot; `None` while disabled.
    pub fn key(&self) -> Option<&OfferKey> {
        self.key.as_ref()
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }
}

/// Read-only handle on a store's state.
///
/// Cheap to clone; every consumer of a version holds its own. There is no way
/// to write through a view.
#[derive(Debug, Clone)]
pub struct OfferView {
    receiver: watch::Receiver<OfferState>,
}

impl OfferView {
    pub(crate) fn new(receiver: watch::Receiver<OfferState>) -> Self {
        Self { receiver }
    }

    /// Run `f` against the current snapshot without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&OfferState) -> R) -> R {
        f(&self.receiver.borrow())
    }

    pub fn snapshot(&self) -> OfferState {
        self.receiver.borrow().clone()
    }

    pub fn disabled(&self) -> bool {
        self.with(OfferState::disabled)
    }

    pub fn loading(&self) -> bool {
        self.with(OfferState::loading)
    }

    pub fn offers(&self) -> Vec<Offer> {
        self.with(|s| s.offers.clone())
    }

    pub fn error(&self) -> Option<FetchError> {
        self.with(|s| s.error.clone())
    }

    /// Wait until a newer snapshot is published.
    ///
    /// Returns `false` once the store has been torn down; the last snapshot
    /// stays readable.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Wait until the snapshot satisfies `predicate` and return it.
    ///
    /// Returns `None` if the store is torn down before that happens.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&OfferState) -> bool,
    ) -> Option<OfferState> {
        self.receiver
            .wait_for(predicate)
            .await
            .ok()
            .map(|state| OfferState::clone(&state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressroom_core::TypeId;

    fn classification(s: &str) -> Classification {
        Classification::of_type(TypeId::new(s).unwrap())
    }

    #[test]
    fn disabled_snapshot_is_empty_and_idle() {
        let state = OfferState::inapplicable(classification("article-generic"));
        assert!(state.disabled());
        assert!(state.offers().is_empty());
        assert!(!state.loading());
        assert!(state.error().is_none());
        assert!(state.key().is_none());
    }

    #[test]
    fn reject_keeps_last_known_offers() {
        let c = classification("broadband-fixed");
        let mut state = OfferState::fetching(c.clone(), c.offer_key(), vec![Offer::labelled("Plan A")]);

        state.reject(FetchError::Network("reset".into()));

        assert_eq!(state.offers(), &[Offer::labelled("Plan A")]);
        assert!(!state.loading());
        assert_eq!(state.error(), Some(&FetchError::Network("reset".into())));
    }

    #[test]
    fn resolve_clears_error() {
        let c = classification("broadband-fixed");
        let mut state = OfferState::fetching(c.clone(), c.offer_key(), vec![]);
        state.reject(FetchError::Network("reset".into()));

        state.resolve(vec![Offer::labelled("Plan B")]);

        assert_eq!(state.offers(), &[Offer::labelled("Plan B")]);
        assert!(state.error().is_none());
    }

    #[tokio::test]
    async fn view_reports_teardown_but_keeps_last_snapshot() {
        let c = classification("broadband-fixed");
        let (tx, rx) = watch::channel(OfferState::settled(
            c.clone(),
            c.offer_key(),
            vec![Offer::labelled("Plan A")],
        ));
        let mut view = OfferView::new(rx);

        drop(tx);

        assert!(!view.changed().await);
        assert_eq!(view.offers(), vec![Offer::labelled("Plan A")]);
    }
}
