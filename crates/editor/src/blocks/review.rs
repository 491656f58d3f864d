//! Review cards: a single headline offer next to a product review.

use pressroom_catalog::Offer;

use super::{BlockKind, OfferBlock, OfferLine, cheapest};
use crate::version::OfferView;

#[derive(Debug, Clone)]
pub struct ReviewCard {
    view: OfferView,
}

impl ReviewCard {
    pub fn new(view: OfferView) -> Self {
        Self { view }
    }
}

impl OfferBlock for ReviewCard {
    fn kind(&self) -> BlockKind {
        BlockKind::ReviewCard
    }

    fn view(&self) -> &OfferView {
        &self.view
    }

    fn shape(&self, offers: &[Offer]) -> Vec<OfferLine> {
        cheapest(offers, 1)
            .into_iter()
            .map(OfferLine::from_offer)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct BroadbandReviewCard {
    view: OfferView,
}

impl BroadbandReviewCard {
    pub fn new(view: OfferView) -> Self {
        Self { view }
    }
}

impl OfferBlock for BroadbandReviewCard {
    fn kind(&self) -> BlockKind {
        BlockKind::BroadbandReviewCard
    }

    fn view(&self) -> &OfferView {
        &self.view
    }

    fn shape(&self, offers: &[Offer]) -> Vec<OfferLine> {
        cheapest(offers, 1)
            .into_iter()
            .map(OfferLine::broadband)
            .collect()
    }
}
