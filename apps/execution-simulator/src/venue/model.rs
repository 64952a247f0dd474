//! Probabilistic venue behaviour.

use super::response::VenueResponse;
use super::universe::Venue;
use crate::domain::order_hierarchy::value_objects::{OrderSide, Urgency};
use crate::domain::shared::{Money, Quantity};
use rand::Rng;

/// Decides how a venue responds to a route order.
///
/// One uniform draw in `[0, 1)` lands in a band: fade first (per-venue
/// probability), then a partial fill at a configured ratio of the
/// requested quantity, then the reject band split evenly between an
/// outright reject and a dead connection, and everything past the
/// bands is a full fill. Executions take exactly one further draw for
/// slippage; non-executions take none, so the random stream position
/// depends only on the sequence of outcomes. The model keeps no state
/// of its own: identical draws produce identical responses.
#[derive(Debug, Clone)]
pub struct VenueResponseModel {
    partial_fill_probability: f64,
    partial_fill_ratio: f64,
    reject_probability: f64,
    reference_price: Money,
}

impl VenueResponseModel {
    /// Slippage over the reference price per urgency, in dollars.
    /// Aggressive instructions pay through the book.
    const CRITICAL_SLIPPAGE: (f64, f64) = (0.02, 0.04);
    const URGENT_SLIPPAGE: (f64, f64) = (0.01, 0.02);
    const NORMAL_SLIPPAGE: (f64, f64) = (-0.01, 0.01);

    /// Creates a model.
    #[must_use]
    pub const fn new(
        partial_fill_probability: f64,
        partial_fill_ratio: f64,
        reject_probability: f64,
        reference_price: Money,
    ) -> Self {
        Self {
            partial_fill_probability,
            partial_fill_ratio,
            reject_probability,
            reference_price,
        }
    }

    /// Reference price executions slip around.
    #[must_use]
    pub const fn reference_price(&self) -> Money {
        self.reference_price
    }

    /// Draws the venue's response to a route order.
    pub fn respond<R: Rng>(
        &self,
        venue: &Venue,
        quantity: Quantity,
        side: OrderSide,
        urgency: Urgency,
        rng: &mut R,
    ) -> VenueResponse {
        let fade_edge = venue.fade_probability();
        let partial_edge = fade_edge + self.partial_fill_probability;
        let reject_mid = partial_edge + self.reject_probability / 2.0;
        let reject_edge = partial_edge + self.reject_probability;

        let outcome: f64 = rng.random();
        if outcome < fade_edge {
            VenueResponse::Fade
        } else if outcome < partial_edge {
            let scaled = (quantity.as_i64() as f64 * self.partial_fill_ratio).floor() as i64;
            VenueResponse::Partial {
                quantity: Quantity::from_i64(scaled.max(1)),
                price: self.execution_price(side, urgency, rng),
            }
        } else if outcome < reject_mid {
            VenueResponse::Reject
        } else if outcome < reject_edge {
            VenueResponse::NoConnection
        } else {
            VenueResponse::Fill {
                quantity,
                price: self.execution_price(side, urgency, rng),
            }
        }
    }

    /// Reference price plus an urgency-banded slippage draw, rounded
    /// to cents. Buys pay the slip, sells give it up.
    fn execution_price<R: Rng>(&self, side: OrderSide, urgency: Urgency, rng: &mut R) -> Money {
        let (low, high) = match urgency {
            Urgency::Critical => Self::CRITICAL_SLIPPAGE,
            Urgency::Urgent => Self::URGENT_SLIPPAGE,
            Urgency::Normal | Urgency::Passive => Self::NORMAL_SLIPPAGE,
        };
        let slip = rng.random_range(low..high);
        let signed = if side.is_buy() { slip } else { -slip };
        (self.reference_price + Money::from_f64(signed)).round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::VenueId;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};
    use rust_decimal_macros::dec;

    /// Replays a fixed list of uniform fractions. Each fraction is
    /// encoded the way the standard f64 distribution decodes a word,
    /// so `rng.random::<f64>()` returns it (within an ulp).
    struct ScriptedRng {
        words: Vec<u64>,
        position: usize,
    }

    impl ScriptedRng {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        fn from_fractions(fractions: &[f64]) -> Self {
            let words = fractions
                .iter()
                .map(|fraction| ((fraction * (1u64 << 53) as f64) as u64) << 11)
                .collect();
            Self { words, position: 0 }
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        fn next_u64(&mut self) -> u64 {
            let word = self.words[self.position];
            self.position += 1;
            word
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            unimplemented!("scripted rng only serves words");
        }
    }

    fn venue(fade_probability: f64) -> Venue {
        Venue::new(VenueId::new("NYSE"), 20_000, fade_probability)
    }

    fn model() -> VenueResponseModel {
        VenueResponseModel::new(0.10, 0.5, 0.02, Money::new(dec!(650.00)))
    }

    fn respond_with_fraction(
        model: &VenueResponseModel,
        venue: &Venue,
        fractions: &[f64],
    ) -> VenueResponse {
        let mut rng = ScriptedRng::from_fractions(fractions);
        model.respond(
            venue,
            Quantity::from_i64(1_000),
            OrderSide::Buy,
            Urgency::Normal,
            &mut rng,
        )
    }

    #[test]
    fn draw_inside_the_fade_band_fades() {
        let response = respond_with_fraction(&model(), &venue(0.05), &[0.03]);
        assert_eq!(response, VenueResponse::Fade);
    }

    #[test]
    fn draw_inside_the_partial_band_fills_half() {
        let response = respond_with_fraction(&model(), &venue(0.05), &[0.10, 0.5]);
        match response {
            VenueResponse::Partial { quantity, .. } => {
                assert_eq!(quantity, Quantity::from_i64(500));
            }
            other => panic!("expected partial, got {other:?}"),
        }
    }

    #[test]
    fn reject_band_splits_between_reject_and_no_connection() {
        let response = respond_with_fraction(&model(), &venue(0.05), &[0.155]);
        assert_eq!(response, VenueResponse::Reject);

        let response = respond_with_fraction(&model(), &venue(0.05), &[0.165]);
        assert_eq!(response, VenueResponse::NoConnection);
    }

    #[test]
    fn draw_past_every_band_fills_in_full() {
        let response = respond_with_fraction(&model(), &venue(0.05), &[0.60, 0.5]);
        match response {
            VenueResponse::Fill { quantity, .. } => {
                assert_eq!(quantity, Quantity::from_i64(1_000));
            }
            other => panic!("expected fill, got {other:?}"),
        }
    }

    #[test]
    fn certain_fade_needs_no_slippage_draw() {
        // A single scripted word: a second draw would panic.
        let response = respond_with_fraction(&model(), &venue(1.0), &[0.999]);
        assert_eq!(response, VenueResponse::Fade);
    }

    #[test]
    fn zero_probabilities_always_fill() {
        let no_fade = venue(0.0);
        let model = VenueResponseModel::new(0.0, 0.5, 0.0, Money::new(dec!(650.00)));
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let response = model.respond(
                &no_fade,
                Quantity::from_i64(100),
                OrderSide::Buy,
                Urgency::Passive,
                &mut rng,
            );
            assert!(matches!(response, VenueResponse::Fill { .. }));
        }
    }

    #[test]
    fn partial_of_a_single_share_is_one_share() {
        let model = VenueResponseModel::new(1.0, 0.5, 0.0, Money::new(dec!(650.00)));
        let mut rng = StdRng::seed_from_u64(7);
        let response = model.respond(
            &venue(0.0),
            Quantity::from_i64(1),
            OrderSide::Buy,
            Urgency::Normal,
            &mut rng,
        );
        match response {
            VenueResponse::Partial { quantity, .. } => {
                assert_eq!(quantity, Quantity::from_i64(1));
            }
            other => panic!("expected partial, got {other:?}"),
        }
    }

    #[test]
    fn partial_quantity_floors_odd_sizes() {
        let model = VenueResponseModel::new(1.0, 0.5, 0.0, Money::new(dec!(650.00)));
        let mut rng = StdRng::seed_from_u64(7);
        let response = model.respond(
            &venue(0.0),
            Quantity::from_i64(4_999),
            OrderSide::Buy,
            Urgency::Normal,
            &mut rng,
        );
        match response {
            VenueResponse::Partial { quantity, .. } => {
                assert_eq!(quantity, Quantity::from_i64(2_499));
            }
            other => panic!("expected partial, got {other:?}"),
        }
    }

    #[test]
    fn partial_ratio_scales_the_filled_quantity() {
        let model = VenueResponseModel::new(1.0, 0.25, 0.0, Money::new(dec!(650.00)));
        let mut rng = StdRng::seed_from_u64(7);
        let response = model.respond(
            &venue(0.0),
            Quantity::from_i64(1_000),
            OrderSide::Buy,
            Urgency::Normal,
            &mut rng,
        );
        match response {
            VenueResponse::Partial { quantity, .. } => {
                assert_eq!(quantity, Quantity::from_i64(250));
            }
            other => panic!("expected partial, got {other:?}"),
        }
    }

    #[test]
    fn critical_buys_pay_through_the_reference() {
        let model = VenueResponseModel::new(0.0, 0.5, 0.0, Money::new(dec!(650.00)));
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let response = model.respond(
                &venue(0.0),
                Quantity::from_i64(100),
                OrderSide::Buy,
                Urgency::Critical,
                &mut rng,
            );
            let (_, price) = response.execution().unwrap();
            assert!(
                price >= Money::new(dec!(650.02)) && price <= Money::new(dec!(650.04)),
                "critical buy priced at {price}"
            );
        }
    }

    #[test]
    fn critical_sells_give_up_the_slippage() {
        let model = VenueResponseModel::new(0.0, 0.5, 0.0, Money::new(dec!(650.00)));
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let response = model.respond(
                &venue(0.0),
                Quantity::from_i64(100),
                OrderSide::Sell,
                Urgency::Critical,
                &mut rng,
            );
            let (_, price) = response.execution().unwrap();
            assert!(
                price >= Money::new(dec!(649.96)) && price <= Money::new(dec!(649.98)),
                "critical sell priced at {price}"
            );
        }
    }

    #[test]
    fn passive_fills_stay_within_a_cent_of_reference() {
        let model = VenueResponseModel::new(0.0, 0.5, 0.0, Money::new(dec!(650.00)));
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..50 {
            let response = model.respond(
                &venue(0.0),
                Quantity::from_i64(100),
                OrderSide::Buy,
                Urgency::Passive,
                &mut rng,
            );
            let (_, price) = response.execution().unwrap();
            assert!(
                price >= Money::new(dec!(649.99)) && price <= Money::new(dec!(650.01)),
                "passive fill priced at {price}"
            );
        }
    }

    #[test]
    fn identical_seeds_replay_identical_responses() {
        let model = model();
        let target = venue(0.05);
        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..25)
                .map(|_| {
                    model.respond(
                        &target,
                        Quantity::from_i64(1_000),
                        OrderSide::Buy,
                        Urgency::Urgent,
                        &mut rng,
                    )
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
