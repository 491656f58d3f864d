//! The catalog offer store: one driver task per attached version.

use std::sync::Arc;
use std::time::Duration;

use pressroom_catalog::{FetchError, Offer, OfferFetcher, OfferKey, TypeCatalog};
use pressroom_core::VersionId;
use tokio::sync::{Notify, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::cache::{CacheLookup, OfferCache};
use super::view::{OfferState, OfferView};
use crate::version::entity::{Classification, ClassificationSubscription, VersionEntity};

/// Offer store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferStoreConfig {
    /// How long a fetched offer list counts as fresh.
    pub cache_ttl: Duration,
    /// Upper bound on a single catalog fetch.
    pub fetch_timeout: Duration,
}

impl Default for OfferStoreConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(300),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl OfferStoreConfig {
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

/// Collaborators shared by every store attached through this factory.
///
/// Attaching is cheap; each attachment gets its own cache and state.
#[derive(Clone)]
pub struct OfferStore {
    types: Arc<dyn TypeCatalog>,
    fetcher: Arc<dyn OfferFetcher>,
    config: OfferStoreConfig,
}

impl core::fmt::Debug for OfferStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OfferStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OfferStore {
    pub fn new(
        types: Arc<dyn TypeCatalog>,
        fetcher: Arc<dyn OfferFetcher>,
        config: OfferStoreConfig,
    ) -> Self {
        Self {
            types,
            fetcher,
            config,
        }
    }

    /// Start observing `version`.
    ///
    /// The current classification is evaluated before this returns, so the
    /// first snapshot a consumer sees already has the right `disabled` value.
    /// Must be called from within a tokio runtime.
    pub fn attach(&self, version: &VersionEntity) -> OfferStoreHandle {
        let version_id = version.id();
        let mut subscription = version.subscribe_classification();
        let initial = subscription.current();

        let (state, _) = watch::channel(OfferState::inapplicable(initial.clone()));
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let shutdown = Arc::new(Notify::new());

        let mut driver = OfferStoreDriver {
            version_id,
            types: Arc::clone(&self.types),
            fetcher: Arc::clone(&self.fetcher),
            config: self.config.clone(),
            cache: OfferCache::new(self.config.cache_ttl),
            pending: None,
            state,
            completions: completions_tx,
        };
        driver.on_classification(initial);
        let receiver = driver.state.subscribe();

        let join = tokio::spawn(driver.run(subscription, completions_rx, Arc::clone(&shutdown)));
        tracing::debug!(version_id = %version_id, "offer store attached");

        OfferStoreHandle {
            version_id,
            receiver,
            shutdown,
            join: Some(join),
        }
    }
}

/// Owner handle of an attached store.
///
/// Dropping the handle (or the version entity) tears the store down. Views
/// handed out earlier keep their last snapshot.
#[derive(Debug)]
pub struct OfferStoreHandle {
    version_id: VersionId,
    receiver: watch::Receiver<OfferState>,
    shutdown: Arc<Notify>,
    join: Option<JoinHandle<()>>,
}

impl OfferStoreHandle {
    /// A read-only view for one consumer.
    ///
    /// The view starts with the current snapshot marked as seen.
    pub fn view(&self) -> OfferView {
        let mut receiver = self.receiver.clone();
        receiver.borrow_and_update();
        OfferView::new(receiver)
    }

    /// Release the subscription and wait for the driver to stop.
    ///
    /// In-flight fetches are abandoned; their results are ignored.
    pub async fn detach(mut self) {
        self.shutdown.notify_one();
        if let Some(join) = self.join.take() {
            if let Err(err) = join.await {
                tracing::error!(version_id = %self.version_id, "offer store driver failed: {err:?}");
            }
        }
    }
}

impl Drop for OfferStoreHandle {
    fn drop(&mut self) {
        self.shutdown.notify_one();
    }
}

#[derive(Debug)]
struct FetchCompletion {
    key: OfferKey,
    outcome: Result<Vec<Offer>, FetchError>,
}

/// Owns all mutable store state. Runs as a single task, so no locking.
struct OfferStoreDriver {
    version_id: VersionId,
    types: Arc<dyn TypeCatalog>,
    fetcher: Arc<dyn OfferFetcher>,
    config: OfferStoreConfig,
    cache: OfferCache,
    /// Key of the one fetch whose result will be applied.
    pending: Option<OfferKey>,
    state: watch::Sender<OfferState>,
    completions: mpsc::UnboundedSender<FetchCompletion>,
}

impl OfferStoreDriver {
    async fn run(
        mut self,
        mut subscription: ClassificationSubscription,
        mut completions: mpsc::UnboundedReceiver<FetchCompletion>,
        shutdown: Arc<Notify>,
    ) {
        loop {
            tokio::select! {
                // Classification first: a completion racing a change must be
                // judged against the newest classification.
                biased;

                _ = shutdown.notified() => {
                    tracing::debug!(version_id = %self.version_id, "offer store detached");
                    break;
                }
                changed = subscription.changed() => match changed {
                    Some(classification) => self.on_classification(classification),
                    None => {
                        tracing::debug!(version_id = %self.version_id, "version closed; releasing offer store");
                        break;
                    }
                },
                Some(done) = completions.recv() => self.on_completion(done),
            }
        }

        if let Some(key) = self.pending.take() {
            tracing::debug!(version_id = %self.version_id, %key, "abandoning in-flight offer fetch");
        }
    }

    fn on_classification(&mut self, classification: Classification) {
        if !self.types.supports_offers(&classification.type_id) {
            if let Some(key) = self.pending.take() {
                tracing::debug!(version_id = %self.version_id, %key, "offers no longer apply; dropping in-flight fetch");
            }
            self.state.send_replace(OfferState::inapplicable(classification));
            return;
        }

        let key = classification.offer_key();
        let next = match self.cache.lookup(&key, Instant::now()) {
            CacheLookup::Fresh(offers) => {
                tracing::debug!(version_id = %self.version_id, %key, "serving offers from cache");
                let offers = offers.to_vec();
                self.pending = None;
                OfferState::settled(classification, key, offers)
            }
            CacheLookup::Expired(offers) => {
                let offers = offers.to_vec();
                self.ensure_fetch(&key);
                OfferState::fetching(classification, key, offers)
            }
            CacheLookup::Missing => {
                self.ensure_fetch(&key);
                OfferState::fetching(classification, key, Vec::new())
            }
        };
        self.state.send_replace(next);
    }

    /// Make `key` the pending fetch, issuing one unless it is already in flight.
    fn ensure_fetch(&mut self, key: &OfferKey) {
        if self.pending.as_ref() == Some(key) {
            return;
        }
        if let Some(stale) = self.pending.replace(key.clone()) {
            tracing::debug!(version_id = %self.version_id, %stale, "superseding in-flight offer fetch");
        }

        tracing::debug!(version_id = %self.version_id, %key, "fetching catalog offers");

        let fetcher = Arc::clone(&self.fetcher);
        let completions = self.completions.clone();
        let timeout = self.config.fetch_timeout;
        let key = key.clone();

        tokio::spawn(async move {
            let outcome = match tokio::time::timeout(timeout, fetcher.fetch(&key)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(timeout)),
            };
            // The driver is gone after teardown; the result has nowhere to go.
            let _ = completions.send(FetchCompletion { key, outcome });
        });
    }

    fn on_completion(&mut self, done: FetchCompletion) {
        if self.pending.as_ref() != Some(&done.key) {
            tracing::debug!(version_id = %self.version_id, key = %done.key, "discarding stale offer fetch result");
            return;
        }
        self.pending = None;

        match done.outcome {
            Ok(offers) => {
                tracing::debug!(
                    version_id = %self.version_id,
                    key = %done.key,
                    count = offers.len(),
                    "catalog offers loaded"
                );
                self.cache.insert(done.key, offers.clone(), Instant::now());
                self.state.send_modify(|state| state.resolve(offers));
            }
            Err(error) => {
                tracing::warn!(
                    version_id = %self.version_id,
                    key = %done.key,
                    transient = error.is_transient(),
                    "catalog offer fetch failed: {error}"
                );
                self.state.send_modify(|state| state.reject(error));
            }
        }
    }
}
