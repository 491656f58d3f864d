//! Per-store cache of fetched offer lists.

use std::collections::HashMap;
use std::time::Duration;

use pressroom_catalog::{Offer, OfferKey};
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry {
    offers: Vec<Offer>,
    fetched_at: Instant,
}

/// Result of a cache lookup.
#[derive(Debug, PartialEq)]
pub(crate) enum CacheLookup<'a> {
    Fresh(&'a [Offer]),
    /// Older than the TTL; still the last known good list for the key.
    Expired(&'a [Offer]),
    Missing,
}

/// Offer lists keyed by offer key, owned by a single store instance.
#[derive(Debug)]
pub(crate) struct OfferCache {
    ttl: Duration,
    entries: HashMap<OfferKey, CacheEntry>,
}

impl OfferCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub(crate) fn lookup(&self, key: &OfferKey, now: Instant) -> CacheLookup<'_> {
        match self.entries.get(key) {
            None => CacheLookup::Missing,
            Some(entry) if now.saturating_duration_since(entry.fetched_at) < self.ttl => {
                CacheLookup::Fresh(&entry.offers)
            }
            Some(entry) => CacheLookup::Expired(&entry.offers),
        }
    }

    pub(crate) fn insert(&mut self, key: OfferKey, offers: Vec<Offer>, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                offers,
                fetched_at: now,
            },
        );
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
