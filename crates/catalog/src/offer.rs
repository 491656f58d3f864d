//! Offer records returned by the catalog.

use std::collections::BTreeMap;

use pressroom_core::{Shortcode, TypeId, ValueObject};
use serde::{Deserialize, Serialize};

/// Key under which offers are fetched and cached.
///
/// A shortcode always wins over the type identifier when both are known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OfferKey {
    Shortcode(Shortcode),
    Type(TypeId),
}

impl OfferKey {
    pub fn derive(type_id: &TypeId, shortcode: Option<&Shortcode>) -> Self {
        match shortcode {
            Some(code) => OfferKey::Shortcode(code.clone()),
            None => OfferKey::Type(type_id.clone()),
        }
    }

    /// Query parameter name used by the catalog endpoint for this key.
    pub fn param_name(&self) -> &'static str {
        match self {
            OfferKey::Shortcode(_) => "shortcode",
            OfferKey::Type(_) => "type",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OfferKey::Shortcode(code) => code.as_str(),
            OfferKey::Type(id) => id.as_str(),
        }
    }
}

impl core::fmt::Display for OfferKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.param_name(), self.as_str())
    }
}

/// Billing period of a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricePeriod {
    OneOff,
    Monthly,
    Yearly,
}

impl PricePeriod {
    fn suffix(self) -> &'static str {
        match self {
            PricePeriod::OneOff => "",
            PricePeriod::Monthly => "/month",
            PricePeriod::Yearly => "/year",
        }
    }
}

/// A price in the smallest currency unit (e.g. pence, cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub amount_minor: u64,
    pub currency: String, // ISO currency code
    #[serde(default = "default_period")]
    pub period: PricePeriod,
}

fn default_period() -> PricePeriod {
    PricePeriod::OneOff
}

impl ValueObject for Price {}

impl Price {
    pub fn one_off(amount_minor: u64, currency: impl Into<String>) -> Self {
        Self {
            amount_minor,
            currency: currency.into(),
            period: PricePeriod::OneOff,
        }
    }

    pub fn monthly(amount_minor: u64, currency: impl Into<String>) -> Self {
        Self {
            amount_minor,
            currency: currency.into(),
            period: PricePeriod::Monthly,
        }
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {}.{:02}{}",
            self.currency,
            self.amount_minor / 100,
            self.amount_minor % 100,
            self.period.suffix()
        )
    }
}

/// One catalog offer (price, label, metadata).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub label: String,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub merchant: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Offer {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            price: None,
            merchant: None,
            url: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Sort key for "cheapest first": unpriced offers sort last.
    pub fn price_rank(&self) -> u64 {
        self.price.as_ref().map_or(u64::MAX, |p| p.amount_minor)
    }
}
