//! Tick database records.

use crate::domain::order_hierarchy::aggregate::Order;
use crate::domain::order_hierarchy::events::OrderEvent;
use crate::domain::order_hierarchy::value_objects::{
    Instruction, OrderLevel, OrderSide, OrderStatus, RejectReason, Urgency,
};
use crate::domain::shared::{ClientOrderId, Money, OrderId, Quantity, Symbol, Timestamp, VenueId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic identifier of a tick record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    /// Creates a record id.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The numeric value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "REC_{:08}", self.0)
    }
}

/// What kind of transition a tick record captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Order submitted.
    New,
    /// Order acknowledged.
    Accepted,
    /// Order rejected above the route level.
    Rejected,
    /// Order cancelled.
    Cancelled,
    /// Route filled in full at its venue.
    VenueFilled,
    /// Route partially filled at its venue.
    VenuePartial,
    /// Route lost to faded liquidity.
    VenueFade,
    /// Route rejected by its venue.
    VenueRejected,
    /// Route could not reach its venue.
    VenueNoConnection,
    /// Slice ledger updated by a propagated fill.
    SliceUpdate,
    /// Algo parent ledger updated by a propagated fill.
    AlgoUpdate,
    /// Client ledger updated by a propagated fill.
    ClientUpdate,
}

impl EventType {
    /// Maps a domain event to the record vocabulary. Route-level
    /// outcomes get venue-prefixed types; fills propagating upward
    /// become per-level update records.
    #[must_use]
    pub fn from_event(event: &OrderEvent) -> Self {
        match (event.level(), event) {
            (_, OrderEvent::Submitted(_)) => Self::New,
            (_, OrderEvent::Accepted(_)) => Self::Accepted,
            (OrderLevel::Route, OrderEvent::Rejected(rejected)) => match &rejected.reason {
                RejectReason::LiquidityFaded => Self::VenueFade,
                RejectReason::VenueRejected { .. } => Self::VenueRejected,
                RejectReason::NoConnection { .. } => Self::VenueNoConnection,
            },
            (_, OrderEvent::Rejected(_)) => Self::Rejected,
            (_, OrderEvent::Cancelled(_)) => Self::Cancelled,
            (OrderLevel::Route, OrderEvent::Filled(_)) => Self::VenueFilled,
            (OrderLevel::Route, OrderEvent::PartiallyFilled(_)) => Self::VenuePartial,
            (OrderLevel::Slice, OrderEvent::Filled(_) | OrderEvent::PartiallyFilled(_)) => {
                Self::SliceUpdate
            }
            (OrderLevel::AlgoParent, OrderEvent::Filled(_) | OrderEvent::PartiallyFilled(_)) => {
                Self::AlgoUpdate
            }
            (OrderLevel::Client, OrderEvent::Filled(_) | OrderEvent::PartiallyFilled(_)) => {
                Self::ClientUpdate
            }
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::New => "NEW",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
            Self::VenueFilled => "VENUE_FILLED",
            Self::VenuePartial => "VENUE_PARTIAL",
            Self::VenueFade => "VENUE_FADE",
            Self::VenueRejected => "VENUE_REJECTED",
            Self::VenueNoConnection => "VENUE_NO_CONNECTION",
            Self::SliceUpdate => "SLICE_UPDATE",
            Self::AlgoUpdate => "ALGO_UPDATE",
            Self::ClientUpdate => "CLIENT_UPDATE",
        };
        write!(f, "{label}")
    }
}

/// One row of the tick database: a full snapshot of an order taken
/// immediately after a lifecycle transition, plus the details of the
/// transition itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Monotonic record id, assigned by the recorder.
    pub record_id: RecordId,
    /// When the transition happened.
    pub timestamp: Timestamp,
    /// Transition kind.
    pub event_type: EventType,
    /// Order the record describes.
    pub order_id: OrderId,
    /// Parent of the order, absent at the root.
    pub parent_order_id: Option<OrderId>,
    /// Client order id shared by the hierarchy.
    pub client_order_id: ClientOrderId,
    /// Hierarchy level of the order.
    pub level: OrderLevel,
    /// Traded symbol.
    pub symbol: Symbol,
    /// Order side.
    pub side: OrderSide,
    /// Status after the transition.
    pub status: OrderStatus,
    /// Total order quantity.
    pub quantity: Quantity,
    /// Filled quantity after the transition.
    pub filled_quantity: Quantity,
    /// Remaining quantity after the transition.
    pub remaining_quantity: Quantity,
    /// Volume-weighted average price after the transition.
    pub average_price: Option<Money>,
    /// Quantity of the fill, for fill records.
    pub fill_quantity: Option<Quantity>,
    /// Price of the fill, for fill records.
    pub fill_price: Option<Money>,
    /// Venue involved, for route records and propagated fills.
    pub venue: Option<VenueId>,
    /// Urgency, for slices and routes.
    pub urgency: Option<Urgency>,
    /// Instruction, for routes.
    pub instruction: Option<Instruction>,
    /// Router pass that created the route, for routes.
    pub attempt: Option<u32>,
    /// Human-readable reason, for rejects and cancels.
    pub reason: Option<String>,
}

impl ExecutionRecord {
    /// Snapshots an order right after it emitted an event.
    #[must_use]
    pub fn snapshot(record_id: RecordId, order: &Order, event: &OrderEvent) -> Self {
        let (fill_quantity, fill_price, fill_venue) = match event {
            OrderEvent::PartiallyFilled(fill) => (
                Some(fill.fill_quantity),
                Some(fill.fill_price),
                Some(fill.venue.clone()),
            ),
            OrderEvent::Filled(fill) => (
                Some(fill.fill_quantity),
                Some(fill.fill_price),
                Some(fill.venue.clone()),
            ),
            _ => (None, None, None),
        };
        let reason = match event {
            OrderEvent::Rejected(rejected) => Some(rejected.reason.to_string()),
            OrderEvent::Cancelled(cancelled) => Some(cancelled.reason.to_string()),
            _ => None,
        };

        Self {
            record_id,
            timestamp: event.timestamp(),
            event_type: EventType::from_event(event),
            order_id: order.order_id().clone(),
            parent_order_id: order.parent_order_id().cloned(),
            client_order_id: order.client_order_id().clone(),
            level: order.level(),
            symbol: order.symbol().clone(),
            side: order.side(),
            status: order.status(),
            quantity: order.quantity(),
            filled_quantity: order.filled_quantity(),
            remaining_quantity: order.remaining_quantity(),
            average_price: order.average_price(),
            fill_quantity,
            fill_price,
            venue: fill_venue.or_else(|| order.venue().cloned()),
            urgency: order.urgency(),
            instruction: order.instruction(),
            attempt: order.attempt(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_hierarchy::events::{OrderAccepted, OrderRejected};
    use crate::domain::order_hierarchy::value_objects::Fill;
    use rust_decimal_macros::dec;

    fn t0() -> Timestamp {
        Timestamp::parse("2025-01-06T08:00:00Z").unwrap()
    }

    fn route_order() -> Order {
        let client = Order::client(
            OrderId::new("CLIENT_001"),
            ClientOrderId::new("CO-1"),
            Symbol::new("TSLA"),
            OrderSide::Buy,
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
            Quantity::from_i64(10_000),
            Urgency::Urgent,
            t0(),
        )
        .unwrap();
        Order::route(
            OrderId::new("SOR_00001"),
            &slice,
            Quantity::from_i64(5_000),
            VenueId::new("NYSE"),
            Urgency::Urgent.instruction(),
            1,
            t0(),
        )
        .unwrap()
    }

    #[test]
    fn record_id_display_pads_to_eight_digits() {
        assert_eq!(format!("{}", RecordId::new(1)), "REC_00000001");
        assert_eq!(format!("{}", RecordId::new(12_345_678)), "REC_12345678");
    }

    #[test]
    fn route_fill_events_map_to_venue_types() {
        let mut route = route_order();
        route.accept(t0()).unwrap();
        route.start_working(t0()).unwrap();
        route
            .apply_fill(
                &Fill::new(
                    OrderId::new("SOR_00001"),
                    Quantity::from_i64(2_000),
                    Money::new(dec!(650.02)),
                    VenueId::new("NYSE"),
                    t0(),
                ),
                t0(),
            )
            .unwrap();
        let events = route.drain_events();
        assert_eq!(EventType::from_event(&events[0]), EventType::New);
        assert_eq!(EventType::from_event(&events[1]), EventType::Accepted);
        assert_eq!(EventType::from_event(&events[2]), EventType::VenuePartial);
    }

    #[test]
    fn route_reject_reasons_map_to_distinct_types() {
        let rejected = |reason: RejectReason| {
            OrderEvent::Rejected(OrderRejected {
                order_id: OrderId::new("SOR_00001"),
                level: OrderLevel::Route,
                reason,
                timestamp: t0(),
            })
        };
        assert_eq!(
            EventType::from_event(&rejected(RejectReason::LiquidityFaded)),
            EventType::VenueFade
        );
        assert_eq!(
            EventType::from_event(&rejected(RejectReason::VenueRejected {
                venue: "NYSE".to_string()
            })),
            EventType::VenueRejected
        );
        assert_eq!(
            EventType::from_event(&rejected(RejectReason::NoConnection {
                venue: "NYSE".to_string()
            })),
            EventType::VenueNoConnection
        );
    }

    #[test]
    fn propagated_fills_map_to_per_level_updates() {
        use crate::domain::order_hierarchy::events::OrderPartiallyFilled;
        let update = |level: OrderLevel| {
            OrderEvent::PartiallyFilled(OrderPartiallyFilled {
                order_id: OrderId::new("X"),
                level,
                fill_quantity: Quantity::from_i64(100),
                fill_price: Money::new(dec!(650)),
                venue: VenueId::new("NYSE"),
                cumulative_quantity: Quantity::from_i64(100),
                leaves_quantity: Quantity::from_i64(900),
                average_price: Money::new(dec!(650)),
                timestamp: t0(),
            })
        };
        assert_eq!(
            EventType::from_event(&update(OrderLevel::Slice)),
            EventType::SliceUpdate
        );
        assert_eq!(
            EventType::from_event(&update(OrderLevel::AlgoParent)),
            EventType::AlgoUpdate
        );
        assert_eq!(
            EventType::from_event(&update(OrderLevel::Client)),
            EventType::ClientUpdate
        );
    }

    #[test]
    fn snapshot_of_a_route_acceptance_carries_the_venue() {
        let mut route = route_order();
        route.accept(t0()).unwrap();
        let events = route.drain_events();
        let record = ExecutionRecord::snapshot(RecordId::new(2), &route, &events[1]);

        assert_eq!(record.event_type, EventType::Accepted);
        assert_eq!(record.status, OrderStatus::Accepted);
        assert_eq!(record.venue, Some(VenueId::new("NYSE")));
        assert_eq!(record.urgency, Some(Urgency::Urgent));
        assert_eq!(record.instruction, Some(Instruction::MarketIoc));
        assert_eq!(record.attempt, Some(1));
        assert_eq!(record.fill_quantity, None);
        assert_eq!(record.average_price, None);
        assert_eq!(record.parent_order_id, Some(OrderId::new("SLICE_00001")));
    }

    #[test]
    fn snapshot_of_a_fill_carries_fill_details_and_totals() {
        let mut route = route_order();
        route.accept(t0()).unwrap();
        route.start_working(t0()).unwrap();
        route
            .apply_fill(
                &Fill::new(
                    OrderId::new("SOR_00001"),
                    Quantity::from_i64(5_000),
                    Money::new(dec!(650.03)),
                    VenueId::new("NYSE"),
                    t0(),
                ),
                t0(),
            )
            .unwrap();
        let events = route.drain_events();
        let record = ExecutionRecord::snapshot(RecordId::new(3), &route, &events[2]);

        assert_eq!(record.event_type, EventType::VenueFilled);
        assert_eq!(record.status, OrderStatus::Filled);
        assert_eq!(record.fill_quantity, Some(Quantity::from_i64(5_000)));
        assert_eq!(record.fill_price, Some(Money::new(dec!(650.03))));
        assert_eq!(record.filled_quantity, Quantity::from_i64(5_000));
        assert_eq!(record.remaining_quantity, Quantity::ZERO);
        assert_eq!(record.average_price, Some(Money::new(dec!(650.03))));
    }

    #[test]
    fn snapshot_of_a_reject_carries_the_reason_text() {
        let mut route = route_order();
        route.accept(t0()).unwrap();
        route.reject(RejectReason::LiquidityFaded, t0()).unwrap();
        let events = route.drain_events();
        let record = ExecutionRecord::snapshot(RecordId::new(3), &route, &events[2]);

        assert_eq!(record.event_type, EventType::VenueFade);
        assert_eq!(record.reason.as_deref(), Some("Liquidity taken by competitor"));
        assert_eq!(record.filled_quantity, Quantity::ZERO);
    }

    #[test]
    fn acceptance_maps_to_accepted_at_any_level() {
        let accepted = OrderEvent::Accepted(OrderAccepted {
            order_id: OrderId::new("CLIENT_001"),
            level: OrderLevel::Client,
            timestamp: t0(),
        });
        assert_eq!(EventType::from_event(&accepted), EventType::Accepted);
    }

    #[test]
    fn event_type_serde_uses_wire_names() {
        let json = serde_json::to_string(&EventType::VenueNoConnection).unwrap();
        assert_eq!(json, "\"VENUE_NO_CONNECTION\"");
        assert_eq!(format!("{}", EventType::SliceUpdate), "SLICE_UPDATE");
    }
}
