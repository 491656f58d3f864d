//! Environment-driven editor configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use pressroom_catalog::HttpOfferFetcher;
use thiserror::Error;

use crate::version::OfferStoreConfig;

pub const CATALOG_URL_ENV: &str = "PRESSROOM_CATALOG_URL";
pub const CATALOG_TOKEN_ENV: &str = "PRESSROOM_CATALOG_TOKEN";
pub const TYPE_TABLE_ENV: &str = "PRESSROOM_TYPE_TABLE";
pub const CACHE_TTL_ENV: &str = "PRESSROOM_OFFER_CACHE_TTL_SECS";
pub const FETCH_TIMEOUT_ENV: &str = "PRESSROOM_OFFER_FETCH_TIMEOUT_MS";
pub const BLOCK_LIMIT_ENV: &str = "PRESSROOM_BLOCK_LIMIT";

const DEFAULT_CATALOG_URL: &str = "http://localhost:8080";
const DEFAULT_BLOCK_LIMIT: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var} ({value:?}): {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub catalog_url: String,
    pub catalog_token: Option<String>,
    pub type_table_path: Option<PathBuf>,
    pub offers: OfferStoreConfig,
    /// Upper bound on rows shown by list-style blocks.
    pub block_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_token: None,
            type_table_path: None,
            offers: OfferStoreConfig::default(),
            block_limit: DEFAULT_BLOCK_LIMIT,
        }
    }
}

impl EditorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        match get(CATALOG_URL_ENV) {
            Some(url) => config.catalog_url = url,
            None => tracing::warn!(
                default = DEFAULT_CATALOG_URL,
                "{CATALOG_URL_ENV} not set; using local default"
            ),
        }
        config.catalog_token = get(CATALOG_TOKEN_ENV);
        config.type_table_path = get(TYPE_TABLE_ENV).map(PathBuf::from);

        if let Some(raw) = get(CACHE_TTL_ENV) {
            let secs: u64 = parse(CACHE_TTL_ENV, &raw)?;
            config.offers = config.offers.with_cache_ttl(Duration::from_secs(secs));
        }
        if let Some(raw) = get(FETCH_TIMEOUT_ENV) {
            let millis: u64 = parse(FETCH_TIMEOUT_ENV, &raw)?;
            if millis == 0 {
                return Err(invalid(FETCH_TIMEOUT_ENV, &raw, "must be greater than zero"));
            }
            config.offers = config.offers.with_fetch_timeout(Duration::from_millis(millis));
        }
        if let Some(raw) = get(BLOCK_LIMIT_ENV) {
            let limit: usize = parse(BLOCK_LIMIT_ENV, &raw)?;
            if limit == 0 {
                return Err(invalid(BLOCK_LIMIT_ENV, &raw, "must be greater than zero"));
            }
            config.block_limit = limit;
        }

        tracing::debug!(
            catalog_url = %config.catalog_url,
            cache_ttl_secs = config.offers.cache_ttl.as_secs(),
            fetch_timeout_ms = config.offers.fetch_timeout.as_millis() as u64,
            block_limit = config.block_limit,
            "editor config loaded"
        );
        Ok(config)
    }

    pub fn fetcher(&self) -> HttpOfferFetcher {
        match &self.catalog_token {
            Some(token) => HttpOfferFetcher::with_token(&self.catalog_url, token),
            None => HttpOfferFetcher::new(&self.catalog_url),
        }
    }
}

fn parse<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|err: T::Err| invalid(var, raw, err.to_string()))
}

fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = EditorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.offers.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.offers.fetch_timeout, Duration::from_secs(10));
    }

    #[test]
    fn reads_all_variables() {
        let config = EditorConfig::from_lookup(lookup(&[
            (CATALOG_URL_ENV, "https://catalog.example/"),
            (CATALOG_TOKEN_ENV, "secret"),
            (TYPE_TABLE_ENV, "/etc/pressroom/types.json"),
            (CACHE_TTL_ENV, "60"),
            (FETCH_TIMEOUT_ENV, "2500"),
            (BLOCK_LIMIT_ENV, "5"),
        ]))
        .unwrap();

        assert_eq!(config.catalog_url, "https://catalog.example/");
        assert_eq!(config.catalog_token.as_deref(), Some("secret"));
        assert_eq!(
            config.type_table_path,
            Some(PathBuf::from("/etc/pressroom/types.json"))
        );
        assert_eq!(config.offers.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.offers.fetch_timeout, Duration::from_millis(2500));
        assert_eq!(config.block_limit, 5);
        assert_eq!(config.fetcher().base_url(), "https://catalog.example");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = EditorConfig::from_lookup(lookup(&[(CATALOG_TOKEN_ENV, "  ")])).unwrap();
        assert!(config.catalog_token.is_none());
    }

    #[test]
    fn non_numeric_ttl_is_rejected() {
        let err = EditorConfig::from_lookup(lookup(&[(CACHE_TTL_ENV, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: CACHE_TTL_ENV, .. }));
    }

    #[test]
    fn zero_limits_are_rejected() {
        let err = EditorConfig::from_lookup(lookup(&[(BLOCK_LIMIT_ENV, "0")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for PRESSROOM_BLOCK_LIMIT (\"0\"): must be greater than zero"
        );
        assert!(EditorConfig::from_lookup(lookup(&[(FETCH_TIMEOUT_ENV, "0")])).is_err());
    }
}
