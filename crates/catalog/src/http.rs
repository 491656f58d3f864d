//! HTTP client for the catalog offers endpoint.

use async_trait::async_trait;
use serde::Deserialize;

use crate::fetch::{FetchError, OfferFetcher};
use crate::offer::{Offer, OfferKey};

#[derive(Debug, Deserialize)]
struct OffersResponse {
    offers: Vec<Offer>,
}

/// Fetches offers with `GET {base_url}/offers?shortcode=..` (or `?type=..`).
#[derive(Debug, Clone)]
pub struct HttpOfferFetcher {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpOfferFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(base_url)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, key: &OfferKey) -> reqwest::RequestBuilder {
        let url = format!("{}/offers", self.base_url);
        let mut req = self
            .client
            .get(url)
            .query(&[(key.param_name(), key.as_str())]);

        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }
}

#[async_trait]
impl OfferFetcher for HttpOfferFetcher {
    async fn fetch(&self, key: &OfferKey) -> Result<Vec<Offer>, FetchError> {
        tracing::debug!(%key, "fetching catalog offers");

        let resp = self
            .request(key)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let body: OffersResponse = resp
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        Ok(body.offers)
    }
}
