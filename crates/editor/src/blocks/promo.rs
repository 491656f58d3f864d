//! Commerce promo: merchant offers highlighted alongside the article.

use pressroom_catalog::Offer;

use super::{BlockKind, OfferBlock, OfferLine};
use crate::version::OfferView;

/// The first `limit` offers the catalog ranks, merchant first.
#[derive(Debug, Clone)]
pub struct CommercePromo {
    view: OfferView,
    limit: usize,
}

impl CommercePromo {
    pub fn new(view: OfferView, limit: usize) -> Self {
        Self { view, limit }
    }
}

impl OfferBlock for CommercePromo {
    fn kind(&self) -> BlockKind {
        BlockKind::CommercePromo
    }

    fn view(&self) -> &OfferView {
        &self.view
    }

    fn shape(&self, offers: &[Offer]) -> Vec<OfferLine> {
        offers
            .iter()
            .take(self.limit)
            .map(|offer| {
                let mut line = OfferLine::from_offer(offer);
                if let Some(merchant) = &offer.merchant {
                    line.label = format!("{merchant}: {}", offer.label);
                }
                line
            })
            .collect()
    }
}
