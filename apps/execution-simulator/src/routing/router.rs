//! Smart order routing of slices across venues.

use crate::domain::order_hierarchy::aggregate::{Order, OrderHierarchy};
use crate::domain::order_hierarchy::services::FillPropagator;
use crate::domain::order_hierarchy::value_objects::{
    Fill, Instruction, OrderSide, RejectReason, Urgency,
};
use crate::domain::shared::{OrderId, Quantity, VenueId};
use crate::recording::ExecutionRecorder;
use crate::simulation::{IdAllocator, SimClock};
use crate::venue::{Venue, VenueResponse, VenueResponseModel, VenueUniverse};
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Outcome summary of routing one slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceExecution {
    /// The slice that was routed.
    pub slice_order_id: OrderId,
    /// Quantity the slice asked for.
    pub requested_quantity: Quantity,
    /// Quantity executed across all passes.
    pub filled_quantity: Quantity,
    /// Quantity left unfilled after the retry budget ran out.
    pub remaining_quantity: Quantity,
    /// Routing passes used, the initial pass included.
    pub attempts: u32,
    /// Route orders created across all passes.
    pub routes_created: usize,
}

impl SliceExecution {
    /// True when the slice filled completely.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.remaining_quantity.is_zero()
    }
}

/// Routes slices across the venue universe.
///
/// Each pass selects the most liquid venues for the slice's urgency,
/// splits the open quantity proportionally to displayed liquidity and
/// dispatches one route order per venue. Quantity lost to fades,
/// rejects and dead connections is re-routed in up to `retry_bound`
/// further passes; each retry escalates the instruction one step and
/// avoids venues that failed earlier, falling back to the full
/// selection when every venue has failed. Whatever remains after the
/// last pass stays visible on the slice as open quantity.
#[derive(Debug)]
pub struct Router {
    universe: VenueUniverse,
    model: VenueResponseModel,
    retry_bound: u32,
}

impl Router {
    /// Latency of one venue interaction step.
    const VENUE_STEP_MS: i64 = 10;
    /// Pause before each retry pass.
    const RETRY_BACKOFF_MS: i64 = 500;

    /// Creates a router.
    #[must_use]
    pub const fn new(universe: VenueUniverse, model: VenueResponseModel, retry_bound: u32) -> Self {
        Self {
            universe,
            model,
            retry_bound,
        }
    }

    /// The venues this router selects from.
    #[must_use]
    pub const fn universe(&self) -> &VenueUniverse {
        &self.universe
    }

    /// Routes a working slice until it fills or the retry budget runs
    /// out, recording every transition.
    ///
    /// # Panics
    ///
    /// Panics when the slice is missing, not in a fillable state, or
    /// carries no urgency, and when any route operation violates the
    /// hierarchy's contracts. The router only ever runs against
    /// hierarchies it extends itself, so these are bugs, not inputs.
    #[allow(clippy::too_many_arguments)]
    pub fn execute_slice<R: Rng>(
        &self,
        hierarchy: &mut OrderHierarchy,
        slice_id: &OrderId,
        ids: &mut IdAllocator,
        clock: &mut SimClock,
        recorder: &mut ExecutionRecorder,
        rng: &mut R,
    ) -> SliceExecution {
        let (side, urgency, requested) = {
            let Some(slice) = hierarchy.get(slice_id) else {
                panic!("routing unknown slice {slice_id}");
            };
            assert!(
                slice.status().can_fill(),
                "slice {slice_id} is {} and cannot be routed",
                slice.status()
            );
            let Some(urgency) = slice.urgency() else {
                panic!("slice {slice_id} carries no urgency");
            };
            (slice.side(), urgency, slice.quantity())
        };
        let venue_count = urgency.venue_count();
        let mut instruction = urgency.instruction();
        let mut failed: HashSet<VenueId> = HashSet::new();
        let mut attempts = 0u32;
        let mut routes_created = 0usize;
        let max_attempts = self.retry_bound.saturating_add(1);

        while attempts < max_attempts {
            let remaining = self.slice_remaining(hierarchy, slice_id);
            if remaining.is_zero() {
                break;
            }
            attempts += 1;
            if attempts > 1 {
                clock.step(Self::RETRY_BACKOFF_MS);
                instruction = instruction.escalated();
            }

            let selected = self.universe.select_excluding(venue_count, &failed);
            assert!(!selected.is_empty(), "no venues available for {slice_id}");
            debug!(
                slice = %slice_id,
                attempt = attempts,
                instruction = %instruction,
                venues = selected.len(),
                quantity = %remaining,
                "routing pass"
            );

            for (venue, route_quantity) in Self::allocate(remaining, &selected) {
                routes_created += 1;
                let failed_venue = self.dispatch_route(
                    hierarchy,
                    slice_id,
                    venue,
                    route_quantity,
                    side,
                    urgency,
                    instruction,
                    attempts,
                    ids,
                    clock,
                    recorder,
                    rng,
                );
                if let Some(venue_id) = failed_venue {
                    failed.insert(venue_id);
                }
            }
        }

        let filled = requested - self.slice_remaining(hierarchy, slice_id);
        let execution = SliceExecution {
            slice_order_id: slice_id.clone(),
            requested_quantity: requested,
            filled_quantity: filled,
            remaining_quantity: requested - filled,
            attempts,
            routes_created,
        };
        if !execution.is_complete() {
            warn!(
                slice = %slice_id,
                remaining = %execution.remaining_quantity,
                attempts = execution.attempts,
                "retry budget exhausted with open quantity"
            );
        }
        execution
    }

    fn slice_remaining(&self, hierarchy: &OrderHierarchy, slice_id: &OrderId) -> Quantity {
        match hierarchy.get(slice_id) {
            Some(slice) => slice.remaining_quantity(),
            None => panic!("routing unknown slice {slice_id}"),
        }
    }

    /// Splits a quantity across venues proportionally to displayed
    /// liquidity. Integer shares, truncation residue to the most
    /// liquid venue, venues with a zero share dropped.
    fn allocate<'a>(quantity: Quantity, venues: &[&'a Venue]) -> Vec<(&'a Venue, Quantity)> {
        let total_liquidity: u128 = venues
            .iter()
            .map(|venue| u128::from(venue.base_liquidity()))
            .sum();
        assert!(total_liquidity > 0, "selected venues display no liquidity");

        let total = quantity.as_i64().max(0) as u128;
        let mut shares: Vec<u128> = venues
            .iter()
            .map(|venue| total * u128::from(venue.base_liquidity()) / total_liquidity)
            .collect();
        let allocated: u128 = shares.iter().sum();
        shares[0] += total - allocated;

        venues
            .iter()
            .zip(shares)
            .filter(|(_, share)| *share > 0)
            .map(|(venue, share)| (*venue, Quantity::from_i64(share as i64)))
            .collect()
    }

    /// Runs one route order through its venue: create, accept, draw
    /// the response, then finalize and cascade. Returns the venue id
    /// when the venue failed the route, so the pass can exclude it.
    #[allow(clippy::too_many_arguments)]
    fn dispatch_route<R: Rng>(
        &self,
        hierarchy: &mut OrderHierarchy,
        slice_id: &OrderId,
        venue: &Venue,
        quantity: Quantity,
        side: OrderSide,
        urgency: Urgency,
        instruction: Instruction,
        attempt: u32,
        ids: &mut IdAllocator,
        clock: &mut SimClock,
        recorder: &mut ExecutionRecorder,
        rng: &mut R,
    ) -> Option<VenueId> {
        let route_id = ids.next_route();

        let at = clock.step(Self::VENUE_STEP_MS);
        let route = {
            let Some(slice) = hierarchy.get(slice_id) else {
                panic!("routing unknown slice {slice_id}");
            };
            match Order::route(
                route_id.clone(),
                slice,
                quantity,
                venue.venue_id().clone(),
                instruction,
                attempt,
                at,
            ) {
                Ok(route) => route,
                Err(err) => panic!("route under {slice_id} failed to build: {err}"),
            }
        };
        if let Err(err) = hierarchy.insert_child(route) {
            panic!("route {route_id} failed to insert: {err}");
        }
        recorder.record_pending(hierarchy, &route_id);

        let at = clock.step(Self::VENUE_STEP_MS);
        match hierarchy.get_mut(&route_id) {
            Some(route) => {
                if let Err(err) = route.accept(at) {
                    panic!("route {route_id} failed to accept: {err}");
                }
            }
            None => panic!("route {route_id} vanished before acceptance"),
        }
        recorder.record_pending(hierarchy, &route_id);

        let at = clock.step(Self::VENUE_STEP_MS);
        let response = self.model.respond(venue, quantity, side, urgency, rng);
        match response {
            VenueResponse::Fill {
                quantity: executed,
                price,
            }
            | VenueResponse::Partial {
                quantity: executed,
                price,
            } => {
                let fill = Fill::new(route_id.clone(), executed, price, venue.venue_id().clone(), at);
                match hierarchy.get_mut(&route_id) {
                    Some(route) => {
                        if let Err(err) = route.start_working(at) {
                            panic!("route {route_id} failed to start working: {err}");
                        }
                        if let Err(err) = route.apply_fill(&fill, at) {
                            panic!("route {route_id} rejected its own fill: {err}");
                        }
                    }
                    None => panic!("route {route_id} vanished before its fill"),
                }
                recorder.record_pending(hierarchy, &route_id);

                let outcome = FillPropagator::propagate(hierarchy, &route_id, &fill, at);
                for event in &outcome.events {
                    match hierarchy.get(event.order_id()) {
                        Some(order) => {
                            recorder.record(order, event);
                        }
                        None => panic!(
                            "propagated event for unknown order {}",
                            event.order_id()
                        ),
                    }
                }
                clock.advance_to(outcome.completed_at);
                debug!(
                    route = %route_id,
                    venue = %venue.venue_id(),
                    quantity = %executed,
                    price = %price,
                    "venue execution"
                );
                None
            }
            VenueResponse::Fade => {
                self.finalize_reject(hierarchy, recorder, &route_id, RejectReason::LiquidityFaded, at);
                Some(venue.venue_id().clone())
            }
            VenueResponse::Reject => {
                self.finalize_reject(
                    hierarchy,
                    recorder,
                    &route_id,
                    RejectReason::VenueRejected {
                        venue: venue.venue_id().to_string(),
                    },
                    at,
                );
                Some(venue.venue_id().clone())
            }
            VenueResponse::NoConnection => {
                self.finalize_reject(
                    hierarchy,
                    recorder,
                    &route_id,
                    RejectReason::NoConnection {
                        venue: venue.venue_id().to_string(),
                    },
                    at,
                );
                Some(venue.venue_id().clone())
            }
        }
    }

    fn finalize_reject(
        &self,
        hierarchy: &mut OrderHierarchy,
        recorder: &mut ExecutionRecorder,
        route_id: &OrderId,
        reason: RejectReason,
        at: crate::domain::shared::Timestamp,
    ) {
        debug!(route = %route_id, reason = %reason, "venue declined");
        match hierarchy.get_mut(route_id) {
            Some(route) => {
                if let Err(err) = route.reject(reason, at) {
                    panic!("route {route_id} failed to reject: {err}");
                }
            }
            None => panic!("route {route_id} vanished before rejection"),
        }
        recorder.record_pending(hierarchy, route_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_hierarchy::value_objects::{OrderStatus, Urgency};
    use crate::domain::shared::{ClientOrderId, Money, Symbol, Timestamp};
    use crate::recording::EventType;
    use rand::{RngCore, SeedableRng};
    use rand::rngs::StdRng;
    use rust_decimal_macros::dec;

    /// Serves a scripted sequence of uniform draws, encoded so that
    /// `Rng::random::<f64>()` returns exactly the given fractions.
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

    fn t0() -> Timestamp {
        Timestamp::parse("2025-01-06T08:00:00Z").unwrap()
    }

    fn two_venue_universe(nyse_fade: f64, nasdaq_fade: f64) -> VenueUniverse {
        VenueUniverse::new(vec![
            Venue::new(VenueId::new("NYSE"), 20_000, nyse_fade),
            Venue::new(VenueId::new("NASDAQ"), 18_000, nasdaq_fade),
        ])
    }

    fn always_fill_model() -> VenueResponseModel {
        VenueResponseModel::new(0.0, 0.5, 0.0, Money::new(dec!(650.00)))
    }

    fn working_slice(quantity: i64, urgency: Urgency) -> (OrderHierarchy, OrderId) {
        let client = Order::client(
            OrderId::new("CLIENT_001"),
            ClientOrderId::new("CO-1"),
            Symbol::new("TSLA"),
            crate::domain::order_hierarchy::value_objects::OrderSide::Buy,
            Quantity::from_i64(30_000),
            t0(),
        )
        .unwrap();
        let algo = Order::algo_parent(
            OrderId::new("ALGO_00001"),
            &client,
            Quantity::from_i64(30_000),
            t0(),
        )
        .unwrap();
        let slice = Order::slice(
            OrderId::new("SLICE_00001"),
            &algo,
            Quantity::from_i64(quantity),
            urgency,
            t0(),
        )
        .unwrap();
        let slice_id = slice.order_id().clone();

        let mut hierarchy = OrderHierarchy::new(client).unwrap();
        hierarchy.insert_child(algo).unwrap();
        hierarchy.insert_child(slice).unwrap();
        for order_id in hierarchy.depth_first_ids() {
            let order = hierarchy.get_mut(&order_id).unwrap();
            order.accept(t0()).unwrap();
            order.start_working(t0()).unwrap();
            order.drain_events();
        }
        (hierarchy, slice_id)
    }

    fn run_router(
        router: &Router,
        hierarchy: &mut OrderHierarchy,
        slice_id: &OrderId,
        seed: u64,
    ) -> (SliceExecution, ExecutionRecorder) {
        let mut ids = IdAllocator::new();
        let mut clock = SimClock::new(t0());
        let mut recorder = ExecutionRecorder::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let execution = router.execute_slice(
            hierarchy,
            slice_id,
            &mut ids,
            &mut clock,
            &mut recorder,
            &mut rng,
        );
        (execution, recorder)
    }

    #[test]
    fn allocate_splits_proportionally_with_residue_to_the_top() {
        let nyse = Venue::new(VenueId::new("NYSE"), 20_000, 0.0);
        let nasdaq = Venue::new(VenueId::new("NASDAQ"), 18_000, 0.0);
        let selected = vec![&nyse, &nasdaq];
        let allocations = Router::allocate(Quantity::from_i64(5_000), &selected);

        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0].0.venue_id(), &VenueId::new("NYSE"));
        assert_eq!(allocations[0].1, Quantity::from_i64(2_632));
        assert_eq!(allocations[1].1, Quantity::from_i64(2_368));
    }

    #[test]
    fn allocate_preserves_total_quantity() {
        let venues = [
            Venue::new(VenueId::new("NYSE"), 20_000, 0.0),
            Venue::new(VenueId::new("NASDAQ"), 18_000, 0.0),
            Venue::new(VenueId::new("DARK"), 15_000, 0.0),
        ];
        let selected: Vec<&Venue> = venues.iter().collect();
        for quantity in [1, 7, 100, 9_999, 30_000] {
            let total: i64 = Router::allocate(Quantity::from_i64(quantity), &selected)
                .iter()
                .map(|(_, share)| share.as_i64())
                .sum();
            assert_eq!(total, quantity, "split of {quantity} lost shares");
        }
    }

    #[test]
    fn allocate_never_creates_zero_quantity_routes() {
        let nyse = Venue::new(VenueId::new("NYSE"), 20_000, 0.0);
        let nasdaq = Venue::new(VenueId::new("NASDAQ"), 18_000, 0.0);
        let selected = vec![&nyse, &nasdaq];
        let allocations = Router::allocate(Quantity::from_i64(1), &selected);

        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].0.venue_id(), &VenueId::new("NYSE"));
        assert_eq!(allocations[0].1, Quantity::from_i64(1));
    }

    #[test]
    fn clean_fills_complete_the_slice_in_one_pass() {
        let router = Router::new(two_venue_universe(0.0, 0.0), always_fill_model(), 2);
        let (mut hierarchy, slice_id) = working_slice(5_000, Urgency::Normal);
        let (execution, _) = run_router(&router, &mut hierarchy, &slice_id, 42);

        assert!(execution.is_complete());
        assert_eq!(execution.attempts, 1);
        assert_eq!(execution.routes_created, 2);
        assert_eq!(execution.filled_quantity, Quantity::from_i64(5_000));

        let slice = hierarchy.get(&slice_id).unwrap();
        assert_eq!(slice.status(), OrderStatus::Filled);
        let routes = hierarchy.children_of(&slice_id);
        assert_eq!(routes.len(), 2);
        let first = hierarchy.get(&routes[0]).unwrap();
        assert_eq!(first.venue(), Some(&VenueId::new("NYSE")));
        assert_eq!(first.quantity(), Quantity::from_i64(2_632));
        assert_eq!(first.attempt(), Some(1));
        hierarchy.audit().unwrap();
    }

    #[test]
    fn urgent_slices_route_across_three_venues() {
        let universe = VenueUniverse::new(vec![
            Venue::new(VenueId::new("NYSE"), 20_000, 0.0),
            Venue::new(VenueId::new("NASDAQ"), 18_000, 0.0),
            Venue::new(VenueId::new("DARK"), 15_000, 0.0),
            Venue::new(VenueId::new("ARCA"), 12_000, 0.0),
        ]);
        let router = Router::new(universe, always_fill_model(), 2);
        let (mut hierarchy, slice_id) = working_slice(9_000, Urgency::Critical);
        let (execution, _) = run_router(&router, &mut hierarchy, &slice_id, 42);

        assert_eq!(execution.routes_created, 3);
        let venues: Vec<&VenueId> = hierarchy
            .children_of(&slice_id)
            .iter()
            .filter_map(|id| hierarchy.get(id).and_then(Order::venue))
            .collect();
        assert_eq!(
            venues,
            vec![
                &VenueId::new("NYSE"),
                &VenueId::new("NASDAQ"),
                &VenueId::new("DARK")
            ]
        );
    }

    #[test]
    fn faded_venue_is_excluded_and_instruction_escalates_on_retry() {
        // NYSE always fades, NASDAQ always fills.
        let router = Router::new(two_venue_universe(1.0, 0.0), always_fill_model(), 2);
        let (mut hierarchy, slice_id) = working_slice(5_000, Urgency::Normal);
        let (execution, _) = run_router(&router, &mut hierarchy, &slice_id, 42);

        assert!(execution.is_complete());
        assert_eq!(execution.attempts, 2);
        assert_eq!(execution.routes_created, 3);

        let routes = hierarchy.children_of(&slice_id);
        let nyse_route = hierarchy.get(&routes[0]).unwrap();
        assert_eq!(nyse_route.status(), OrderStatus::Rejected);
        assert_eq!(
            nyse_route.reject_reason(),
            Some(&RejectReason::LiquidityFaded)
        );

        // The retry pass re-routes the faded quantity to NASDAQ alone,
        // one step more aggressive.
        let retry_route = hierarchy.get(&routes[2]).unwrap();
        assert_eq!(retry_route.venue(), Some(&VenueId::new("NASDAQ")));
        assert_eq!(retry_route.quantity(), Quantity::from_i64(2_632));
        assert_eq!(retry_route.instruction(), Some(Instruction::MarketIoc));
        assert_eq!(retry_route.attempt(), Some(2));
        assert_eq!(retry_route.status(), OrderStatus::Filled);
        hierarchy.audit().unwrap();
    }

    #[test]
    fn exhausted_retries_leave_the_residual_visible() {
        let router = Router::new(two_venue_universe(1.0, 1.0), always_fill_model(), 1);
        let (mut hierarchy, slice_id) = working_slice(5_000, Urgency::Normal);
        let (execution, _) = run_router(&router, &mut hierarchy, &slice_id, 42);

        assert!(!execution.is_complete());
        assert_eq!(execution.attempts, 2);
        assert_eq!(execution.filled_quantity, Quantity::ZERO);
        assert_eq!(execution.remaining_quantity, Quantity::from_i64(5_000));

        // No fills at all, so the slice is still working and every
        // route ended rejected.
        let slice = hierarchy.get(&slice_id).unwrap();
        assert_eq!(slice.status(), OrderStatus::Working);
        for route_id in hierarchy.children_of(&slice_id) {
            assert_eq!(
                hierarchy.get(route_id).unwrap().status(),
                OrderStatus::Rejected
            );
        }
        hierarchy.audit().unwrap();
    }

    #[test]
    fn retry_fade_leaves_half_the_slice_open() {
        // Equal liquidity splits 5,000 into 2,500 per venue. Scripted
        // draws: NASDAQ fades, NYSE fills (plus a price draw), then
        // the lone retry to NYSE fades too.
        let universe = VenueUniverse::new(vec![
            Venue::new(VenueId::new("NASDAQ"), 18_000, 0.5),
            Venue::new(VenueId::new("NYSE"), 18_000, 0.5),
        ]);
        let router = Router::new(universe, always_fill_model(), 1);
        let (mut hierarchy, slice_id) = working_slice(5_000, Urgency::Normal);

        let mut ids = IdAllocator::new();
        let mut clock = SimClock::new(t0());
        let mut recorder = ExecutionRecorder::new();
        let mut rng = ScriptedRng::from_fractions(&[0.3, 0.7, 0.5, 0.2]);
        let execution = router.execute_slice(
            &mut hierarchy,
            &slice_id,
            &mut ids,
            &mut clock,
            &mut recorder,
            &mut rng,
        );

        assert!(!execution.is_complete());
        assert_eq!(execution.attempts, 2);
        assert_eq!(execution.routes_created, 3);
        assert_eq!(execution.filled_quantity, Quantity::from_i64(2_500));
        assert_eq!(execution.remaining_quantity, Quantity::from_i64(2_500));

        let slice = hierarchy.get(&slice_id).unwrap();
        assert_eq!(slice.status(), OrderStatus::PartiallyFilled);
        assert_eq!(slice.remaining_quantity(), Quantity::from_i64(2_500));

        let routes = hierarchy.children_of(&slice_id);
        let retry = hierarchy.get(&routes[2]).unwrap();
        assert_eq!(retry.venue(), Some(&VenueId::new("NYSE")));
        assert_eq!(retry.attempt(), Some(2));
        assert_eq!(retry.status(), OrderStatus::Rejected);
        assert_eq!(retry.reject_reason(), Some(&RejectReason::LiquidityFaded));
        hierarchy.audit().unwrap();
    }

    #[test]
    fn partial_fills_leave_the_slice_partially_filled() {
        let partial_model = VenueResponseModel::new(1.0, 0.5, 0.0, Money::new(dec!(650.00)));
        let router = Router::new(two_venue_universe(0.0, 0.0), partial_model, 0);
        let (mut hierarchy, slice_id) = working_slice(5_000, Urgency::Normal);
        let (execution, _) = run_router(&router, &mut hierarchy, &slice_id, 42);

        assert_eq!(execution.attempts, 1);
        assert_eq!(execution.filled_quantity, Quantity::from_i64(2_500));
        assert_eq!(execution.remaining_quantity, Quantity::from_i64(2_500));

        let slice = hierarchy.get(&slice_id).unwrap();
        assert_eq!(slice.status(), OrderStatus::PartiallyFilled);
        hierarchy.audit().unwrap();
    }

    #[test]
    fn record_stream_follows_the_leaf_to_root_contract() {
        let router = Router::new(two_venue_universe(0.0, 0.0), always_fill_model(), 2);
        let (mut hierarchy, slice_id) = working_slice(1_000, Urgency::Passive);
        let (_, recorder) = run_router(&router, &mut hierarchy, &slice_id, 42);

        let types: Vec<EventType> = recorder
            .records()
            .iter()
            .map(|record| record.event_type)
            .collect();
        assert_eq!(
            types,
            vec![
                EventType::New,
                EventType::Accepted,
                EventType::VenueFilled,
                EventType::SliceUpdate,
                EventType::AlgoUpdate,
                EventType::ClientUpdate,
                EventType::New,
                EventType::Accepted,
                EventType::VenueFilled,
                EventType::SliceUpdate,
                EventType::AlgoUpdate,
                EventType::ClientUpdate,
            ]
        );

        let timestamps: Vec<_> = recorder
            .records()
            .iter()
            .map(|record| record.timestamp)
            .collect();
        assert!(
            timestamps.windows(2).all(|pair| pair[0] <= pair[1]),
            "record timestamps regressed"
        );
    }

    #[test]
    fn rejected_routes_never_carry_fills() {
        let reject_model = VenueResponseModel::new(0.0, 0.5, 1.0, Money::new(dec!(650.00)));
        let router = Router::new(two_venue_universe(0.0, 0.0), reject_model, 0);
        let (mut hierarchy, slice_id) = working_slice(5_000, Urgency::Normal);
        let (execution, recorder) = run_router(&router, &mut hierarchy, &slice_id, 42);

        assert_eq!(execution.filled_quantity, Quantity::ZERO);
        for route_id in hierarchy.children_of(&slice_id) {
            let route = hierarchy.get(route_id).unwrap();
            assert_eq!(route.status(), OrderStatus::Rejected);
            assert_eq!(route.filled_quantity(), Quantity::ZERO);
            assert!(matches!(
                route.reject_reason(),
                Some(RejectReason::VenueRejected { .. } | RejectReason::NoConnection { .. })
            ));
        }
        assert!(
            recorder.records().iter().all(|record| !matches!(
                record.event_type,
                EventType::VenueFilled | EventType::VenuePartial
            ))
        );
    }

    #[test]
    fn identical_seeds_produce_identical_record_streams() {
        let build = || {
            let universe = two_venue_universe(0.05, 0.10);
            let model = VenueResponseModel::new(0.10, 0.5, 0.02, Money::new(dec!(650.00)));
            Router::new(universe, model, 2)
        };
        let run = |seed: u64| {
            let router = build();
            let (mut hierarchy, slice_id) = working_slice(5_000, Urgency::Normal);
            let (_, recorder) = run_router(&router, &mut hierarchy, &slice_id, seed);
            serde_json::to_string(&recorder.freeze()).unwrap()
        };
        assert_eq!(run(7), run(7));
        assert_ne!(run(7), run(8));
    }
}
