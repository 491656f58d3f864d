//! Listicle blocks: ranked lists of offers inside article content.

use pressroom_catalog::Offer;

use super::{BlockKind, OfferBlock, OfferLine, cheapest};
use crate::version::OfferView;

/// Offers in catalog order.
#[derive(Debug, Clone)]
pub struct Listicle {
    view: OfferView,
    limit: usize,
}

impl Listicle {
    pub fn new(view: OfferView, limit: usize) -> Self {
        Self { view, limit }
    }
}

impl OfferBlock for Listicle {
    fn kind(&self) -> BlockKind {
        BlockKind::Listicle
    }

    fn view(&self) -> &OfferView {
        &self.view
    }

    fn shape(&self, offers: &[Offer]) -> Vec<OfferLine> {
        offers
            .iter()
            .take(self.limit)
            .map(OfferLine::from_offer)
            .collect()
    }
}

/// Broadband plans in catalog order, with speed and contract detail.
#[derive(Debug, Clone)]
pub struct BroadbandListicle {
    view: OfferView,
    limit: usize,
}

impl BroadbandListicle {
    pub fn new(view: OfferView, limit: usize) -> Self {
        Self { view, limit }
    }
}

impl OfferBlock for BroadbandListicle {
    fn kind(&self) -> BlockKind {
        BlockKind::BroadbandListicle
    }

    fn view(&self) -> &OfferView {
        &self.view
    }

    fn shape(&self, offers: &[Offer]) -> Vec<OfferLine> {
        offers
            .iter()
            .take(self.limit)
            .map(OfferLine::broadband)
            .collect()
    }
}

/// Listicle embedded in unrelated content: the cheapest few offers.
#[derive(Debug, Clone)]
pub struct CrossContentListicle {
    view: OfferView,
    limit: usize,
}

impl CrossContentListicle {
    pub fn new(view: OfferView, limit: usize) -> Self {
        Self { view, limit }
    }
}

impl OfferBlock for CrossContentListicle {
    fn kind(&self) -> BlockKind {
        BlockKind::CrossContentListicle
    }

    fn view(&self) -> &OfferView {
        &self.view
    }

    fn shape(&self, offers: &[Offer]) -> Vec<OfferLine> {
        cheapest(offers, self.limit)
            .into_iter()
            .map(OfferLine::from_offer)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockRender;
    use crate::blocks::testing::*;

    fn labels(render: BlockRender) -> Vec<String> {
        match render {
            BlockRender::Offers { lines, .. } => lines.into_iter().map(|l| l.label).collect(),
            other => panic!("expected offers, got {other:?}"),
        }
    }

    fn offers() -> Vec<Offer> {
        vec![priced("mid", 2000), priced("high", 4000), priced("low", 1000)]
    }

    #[test]
    fn listicle_keeps_catalog_order_up_to_limit() {
        let (_tx, view) = view_of(settled(offers()));
        assert_eq!(labels(Listicle::new(view, 2).render()), vec!["mid", "high"]);
    }

    #[test]
    fn cross_content_listicle_picks_cheapest() {
        let (_tx, view) = view_of(settled(offers()));
        assert_eq!(
            labels(CrossContentListicle::new(view, 2).render()),
            vec!["low", "mid"]
        );
    }

    #[test]
    fn broadband_listicle_adds_detail() {
        let offer = priced("Fibre 900", 4500).with_metadata("speed_mbps", serde_json::json!(900));
        let (_tx, view) = view_of(settled(vec![offer]));
        match BroadbandListicle::new(view, 3).render() {
            BlockRender::Offers { lines, notice } => {
                assert_eq!(lines[0].detail.as_deref(), Some("900 Mbps"));
                assert!(notice.is_none());
            }
            other => panic!("expected offers, got {other:?}"),
        }
    }

    #[test]
    fn listicles_follow_store_updates() {
        let (tx, view) = view_of(settled(offers()));
        let block = Listicle::new(view, 5);
        assert_eq!(labels(block.render()).len(), 3);

        tx.send_replace(settled(vec![priced("only", 100)]));

        assert_eq!(labels(block.render()), vec!["only"]);
    }
}
