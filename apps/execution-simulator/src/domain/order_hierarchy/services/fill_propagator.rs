//! Upward fill propagation through the hierarchy.

use crate::domain::order_hierarchy::aggregate::OrderHierarchy;
use crate::domain::order_hierarchy::events::OrderEvent;
use crate::domain::order_hierarchy::value_objects::{Fill, OrderLevel};
use crate::domain::shared::{OrderId, Timestamp};

/// Result of cascading one route fill up the tree.
#[derive(Debug)]
pub struct PropagationOutcome {
    /// Events drained from the ancestors, leaf level first.
    pub events: Vec<OrderEvent>,
    /// Time of the last (client-level) ledger update.
    pub completed_at: Timestamp,
}

/// Cascades route fills to slice, algo parent and client.
///
/// The router applies a fill at the route level and finalizes the
/// route; this service applies the identical fill fact at each
/// ancestor, stepping the clock by [`FillPropagator::STEP_MS`] per
/// level. The same fill flowing through every ledger is what keeps the
/// client a faithful mirror of the algo parent: no level recomputes
/// totals from siblings.
///
/// A fill that does not propagate cleanly is not an operational error
/// to report back to a caller. It means the hierarchy itself is
/// broken, so every contract violation here panics.
pub struct FillPropagator;

impl FillPropagator {
    /// Clock step between consecutive ledger updates in the cascade.
    pub const STEP_MS: i64 = 5;

    /// Applies a route's fill at the slice, algo parent and client,
    /// in that order, and returns the drained events.
    ///
    /// # Panics
    ///
    /// Panics when the route is missing, the ancestor chain does not
    /// run slice, algo parent, client, or any ancestor cannot absorb
    /// the fill. All of these mean an upstream component corrupted the
    /// hierarchy.
    pub fn propagate(
        hierarchy: &mut OrderHierarchy,
        route_id: &OrderId,
        fill: &Fill,
        route_filled_at: Timestamp,
    ) -> PropagationOutcome {
        let ancestors = Self::ancestor_chain(hierarchy, route_id);
        let mut events = Vec::with_capacity(ancestors.len());
        let mut at = route_filled_at;

        for (order_id, expected_level) in ancestors {
            at = at.plus_millis(Self::STEP_MS);
            let Some(order) = hierarchy.get_mut(&order_id) else {
                panic!("fill cascade from {route_id} hit a missing order {order_id}");
            };
            assert!(
                order.level() == expected_level,
                "fill cascade from {route_id} expected {expected_level} at {order_id}, found {}",
                order.level()
            );
            if let Err(err) = order.apply_fill(fill, at) {
                panic!("fill from {route_id} does not fit its ancestor {order_id}: {err}");
            }
            events.extend(order.drain_events());
        }

        PropagationOutcome {
            events,
            completed_at: at,
        }
    }

    /// Resolves the slice, algo parent and client above a route.
    fn ancestor_chain(
        hierarchy: &OrderHierarchy,
        route_id: &OrderId,
    ) -> Vec<(OrderId, OrderLevel)> {
        let Some(route) = hierarchy.get(route_id) else {
            panic!("fill cascade started from unknown route {route_id}");
        };
        assert!(
            route.level() == OrderLevel::Route,
            "fill cascade must start at a route, {route_id} is {}",
            route.level()
        );

        let mut chain = Vec::with_capacity(3);
        let mut current = route.parent_order_id().cloned();
        let mut expected = route.level().parent();
        while let (Some(order_id), Some(level)) = (current, expected) {
            let Some(order) = hierarchy.get(&order_id) else {
                panic!("fill cascade from {route_id} hit a missing ancestor {order_id}");
            };
            chain.push((order_id, level));
            current = order.parent_order_id().cloned();
            expected = level.parent();
        }
        assert!(
            chain.len() == 3,
            "route {route_id} has {} ancestors, expected slice, algo parent and client",
            chain.len()
        );
        chain
    }
}
