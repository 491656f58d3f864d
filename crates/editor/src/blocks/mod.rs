//! Editor blocks that show catalog offers.
//!
//! Every block holds an [`OfferView`] for the version it renders and derives
//! its output from one snapshot at a time. Blocks keep no flags of their own:
//! whether offers apply is the store's call, never the block's.

mod listicle;
mod promo;
mod review;

use pressroom_catalog::Offer;
use serde::Serialize;

use crate::version::{OfferState, OfferStoreHandle, OfferView};

pub use listicle::{BroadbandListicle, CrossContentListicle, Listicle};
pub use promo::CommercePromo;
pub use review::{BroadbandReviewCard, ReviewCard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    BroadbandListicle,
    BroadbandReviewCard,
    CommercePromo,
    CrossContentListicle,
    Listicle,
    ReviewCard,
}

/// One rendered offer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferLine {
    pub label: String,
    pub price: Option<String>,
    pub merchant: Option<String>,
    pub url: Option<String>,
    /// Block-specific extra text (e.g. broadband speed and contract).
    pub detail: Option<String>,
}

impl OfferLine {
    pub(crate) fn from_offer(offer: &Offer) -> Self {
        Self {
            label: offer.label.clone(),
            price: offer.price.as_ref().map(ToString::to_string),
            merchant: offer.merchant.clone(),
            url: offer.url.clone(),
            detail: None,
        }
    }

    /// Row with speed/contract detail taken from offer metadata.
    pub(crate) fn broadband(offer: &Offer) -> Self {
        let speed = offer
            .metadata
            .get("speed_mbps")
            .and_then(serde_json::Value::as_u64)
            .map(|mbps| format!("{mbps} Mbps"));
        let contract = offer
            .metadata
            .get("contract_months")
            .and_then(serde_json::Value::as_u64)
            .map(|months| format!("{months} month contract"));

        let detail = match (speed, contract) {
            (Some(s), Some(c)) => Some(format!("{s}, {c}")),
            (s, c) => s.or(c),
        };

        Self {
            detail,
            ..Self::from_offer(offer)
        }
    }
}

/// What a block shows for the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BlockRender {
    /// Offers do not apply to this version's type.
    Hidden,
    /// First fetch for the current key is in flight.
    Loading,
    /// The fetch failed and there is nothing to fall back on.
    Unavailable { message: String },
    /// The catalog returned no offers.
    Empty,
    Offers {
        lines: Vec<OfferLine>,
        /// Set while refreshing or after a failed refresh of shown offers.
        notice: Option<String>,
    },
}

/// Shared rendering rules; `shape` picks and formats the block's rows.
pub(crate) fn render_state(
    state: &OfferState,
    shape: impl FnOnce(&[Offer]) -> Vec<OfferLine>,
) -> BlockRender {
    if state.disabled() {
        return BlockRender::Hidden;
    }

    let offers = state.offers();
    if offers.is_empty() {
        return match (state.loading(), state.error()) {
            (true, _) => BlockRender::Loading,
            (false, Some(err)) => BlockRender::Unavailable {
                message: err.to_string(),
            },
            (false, None) => BlockRender::Empty,
        };
    }

    let notice = match (state.error(), state.loading()) {
        (Some(err), _) => Some(format!("Prices may be out of date: {err}")),
        (None, true) => Some("Refreshing prices".to_string()),
        (None, false) => None,
    };

    BlockRender::Offers {
        lines: shape(offers),
        notice,
    }
}

/// Up to `limit` offers, cheapest first; ties keep catalog order.
pub(crate) fn cheapest(offers: &[Offer], limit: usize) -> Vec<&Offer> {
    let mut ranked: Vec<&Offer> = offers.iter().collect();
    ranked.sort_by_key(|offer| offer.price_rank());
    ranked.truncate(limit);
    ranked
}

/// A block that renders catalog offers for one version.
pub trait OfferBlock: Send {
    fn kind(&self) -> BlockKind;

    fn view(&self) -> &OfferView;

    /// Pick and format the rows this block shows.
    fn shape(&self, offers: &[Offer]) -> Vec<OfferLine>;

    fn render(&self) -> BlockRender {
        self.view().with(|state| render_state(state, |offers| self.shape(offers)))
    }
}

/// All six offer blocks for the version behind `store`, one view each.
pub fn for_version(store: &OfferStoreHandle, limit: usize) -> Vec<Box<dyn OfferBlock>> {
    vec![
        Box::new(BroadbandListicle::new(store.view(), limit)),
        Box::new(BroadbandReviewCard::new(store.view())),
        Box::new(CommercePromo::new(store.view(), limit)),
        Box::new(CrossContentListicle::new(store.view(), limit)),
        Box::new(Listicle::new(store.view(), limit)),
        Box::new(ReviewCard::new(store.view())),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    use pressroom_catalog::{FetchError, Offer, Price};
    use pressroom_core::TypeId;
    use tokio::sync::watch;

    use crate::version::{Classification, OfferState, OfferView};

    pub(crate) fn classification() -> Classification {
        Classification::of_type(TypeId::new("broadband-fixed").unwrap())
    }

    pub(crate) fn priced(label: &str, amount_minor: u64) -> Offer {
        Offer::labelled(label).with_price(Price::monthly(amount_minor, "GBP"))
    }

    pub(crate) fn settled(offers: Vec<Offer>) -> OfferState {
        let c = classification();
        OfferState::settled(c.clone(), c.offer_key(), offers)
    }

    pub(crate) fn failed(offers: Vec<Offer>, error: FetchError) -> OfferState {
        let c = classification();
        let mut state = OfferState::fetching(c.clone(), c.offer_key(), offers);
        state.reject(error);
        state
    }

    /// A view over a fixed snapshot, plus the sender keeping it open.
    pub(crate) fn view_of(state: OfferState) -> (watch::Sender<OfferState>, OfferView) {
        let (tx, rx) = watch::channel(state);
        (tx, OfferView::new(rx))
    }
}
