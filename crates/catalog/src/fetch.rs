//! Catalog fetch endpoint contract.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::offer::{Offer, OfferKey};

/// A failed offer fetch.
///
/// Cloneable so the offer store can keep the last failure in its published
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("catalog fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("catalog API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
}

impl FetchError {
    /// Whether retrying the same key later can reasonably succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout(_) | FetchError::Network(_) => true,
            FetchError::Api { status, .. } => *status >= 500 || *status == 429,
            FetchError::Parse(_) => false,
        }
    }
}

/// Asynchronous source of offer lists.
///
/// Calls are idempotent and safe to repeat with the same key; the offer store
/// may issue a fetch whose result it later ignores.
#[async_trait]
pub trait OfferFetcher: Send + Sync {
    async fn fetch(&self, key: &OfferKey) -> Result<Vec<Offer>, FetchError>;
}

#[async_trait]
impl<F> OfferFetcher for Arc<F>
where
    F: OfferFetcher + ?Sized,
{
    async fn fetch(&self, key: &OfferKey) -> Result<Vec<Offer>, FetchError> {
        (**self).fetch(key).await
    }
}

#[derive(Debug, Clone)]
struct Scripted {
    response: Result<Vec<Offer>, FetchError>,
    latency: Duration,
}

/// In-memory fetcher for tests/dev.
///
/// - Responses and simulated latency are scripted per key
/// - Unknown keys answer with an empty list
/// - Every call is counted, including ones whose result is later discarded
#[derive(Debug, Default)]
pub struct InMemoryOfferFetcher {
    scripts: Mutex<HashMap<OfferKey, Scripted>>,
    calls: Mutex<Vec<OfferKey>>,
}

impl InMemoryOfferFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `key` with `offers` after `latency`.
    pub fn respond(&self, key: OfferKey, offers: Vec<Offer>, latency: Duration) {
        self.script(key, Ok(offers), latency);
    }

    /// Fail `key` with `error` after `latency`.
    pub fn fail(&self, key: OfferKey, error: FetchError, latency: Duration) {
        self.script(key, Err(error), latency);
    }

    fn script(&self, key: OfferKey, response: Result<Vec<Offer>, FetchError>, latency: Duration) {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.insert(key, Scripted { response, latency });
        }
    }

    /// Keys fetched so far, in call order.
    pub fn calls(&self) -> Vec<OfferKey> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, key: &OfferKey) -> usize {
        self.calls
            .lock()
            .map(|c| c.iter().filter(|k| *k == key).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl OfferFetcher for InMemoryOfferFetcher {
    async fn fetch(&self, key: &OfferKey) -> Result<Vec<Offer>, FetchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(key.clone());
        }

        let scripted = self
            .scripts
            .lock()
            .ok()
            .and_then(|scripts| scripts.get(key).cloned());

        let Some(scripted) = scripted else {
            return Ok(Vec::new());
        };

        if !scripted.latency.is_zero() {
            tokio::time::sleep(scripted.latency).await;
        }
        scripted.response
    }
}
