//! Domain events emitted by order aggregates.
//!
//! Every lifecycle transition pushes one event onto the aggregate's
//! pending list. Callers drain the list after each operation and feed
//! the events to the execution recorder, so the tick database sees the
//! transitions in exactly the order they happened.

use crate::domain::order_hierarchy::value_objects::{
    CancelReason, OrderLevel, OrderSide, RejectReason,
};
use crate::domain::shared::{Money, OrderId, Quantity, Symbol, Timestamp, VenueId};
use serde::{Deserialize, Serialize};

/// Order created and submitted into the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSubmitted {
    /// Order identifier.
    pub order_id: OrderId,
    /// Hierarchy level of the order.
    pub level: OrderLevel,
    /// Traded symbol.
    pub symbol: Symbol,
    /// Order side.
    pub side: OrderSide,
    /// Order quantity.
    pub quantity: Quantity,
    /// When the order was submitted.
    pub timestamp: Timestamp,
}

/// Order acknowledged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAccepted {
    /// Order identifier.
    pub order_id: OrderId,
    /// Hierarchy level of the order.
    pub level: OrderLevel,
    /// When the order was accepted.
    pub timestamp: Timestamp,
}

/// Order received a fill but still has open quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPartiallyFilled {
    /// Order identifier.
    pub order_id: OrderId,
    /// Hierarchy level of the order.
    pub level: OrderLevel,
    /// Quantity of this fill.
    pub fill_quantity: Quantity,
    /// Price of this fill.
    pub fill_price: Money,
    /// Venue the fill printed on.
    pub venue: VenueId,
    /// Quantity filled so far.
    pub cumulative_quantity: Quantity,
    /// Quantity still open.
    pub leaves_quantity: Quantity,
    /// Volume-weighted average fill price.
    pub average_price: Money,
    /// When the fill applied.
    pub timestamp: Timestamp,
}

/// Order received its final fill and is complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFilled {
    /// Order identifier.
    pub order_id: OrderId,
    /// Hierarchy level of the order.
    pub level: OrderLevel,
    /// Quantity of the closing fill.
    pub fill_quantity: Quantity,
    /// Price of the closing fill.
    pub fill_price: Money,
    /// Venue the closing fill printed on.
    pub venue: VenueId,
    /// Total filled quantity, equal to the order quantity.
    pub cumulative_quantity: Quantity,
    /// Volume-weighted average fill price.
    pub average_price: Money,
    /// When the closing fill applied.
    pub timestamp: Timestamp,
}

/// Order rejected before it started working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRejected {
    /// Order identifier.
    pub order_id: OrderId,
    /// Hierarchy level of the order.
    pub level: OrderLevel,
    /// Why the order was rejected.
    pub reason: RejectReason,
    /// When the rejection happened.
    pub timestamp: Timestamp,
}

/// Order cancelled with quantity still open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCancelled {
    /// Order identifier.
    pub order_id: OrderId,
    /// Hierarchy level of the order.
    pub level: OrderLevel,
    /// Why the order was cancelled.
    pub reason: CancelReason,
    /// Quantity left open at cancellation.
    pub leaves_quantity: Quantity,
    /// When the cancellation happened.
    pub timestamp: Timestamp,
}

/// Domain events for order lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OrderEvent {
    /// Order created and submitted.
    Submitted(OrderSubmitted),
    /// Order acknowledged.
    Accepted(OrderAccepted),
    /// Order partially filled.
    PartiallyFilled(OrderPartiallyFilled),
    /// Order completely filled.
    Filled(OrderFilled),
    /// Order rejected.
    Rejected(OrderRejected),
    /// Order cancelled.
    Cancelled(OrderCancelled),
}

impl OrderEvent {
    /// Order this event belongs to.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        match self {
            Self::Submitted(event) => &event.order_id,
            Self::Accepted(event) => &event.order_id,
            Self::PartiallyFilled(event) => &event.order_id,
            Self::Filled(event) => &event.order_id,
            Self::Rejected(event) => &event.order_id,
            Self::Cancelled(event) => &event.order_id,
        }
    }

    /// Hierarchy level of the order this event belongs to.
    #[must_use]
    pub const fn level(&self) -> OrderLevel {
        match self {
            Self::Submitted(event) => event.level,
            Self::Accepted(event) => event.level,
            Self::PartiallyFilled(event) => event.level,
            Self::Filled(event) => event.level,
            Self::Rejected(event) => event.level,
            Self::Cancelled(event) => event.level,
        }
    }

    /// When the event happened.
    #[must_use]
    pub const fn timestamp(&self) -> Timestamp {
        match self {
            Self::Submitted(event) => event.timestamp,
            Self::Accepted(event) => event.timestamp,
            Self::PartiallyFilled(event) => event.timestamp,
            Self::Filled(event) => event.timestamp,
            Self::Rejected(event) => event.timestamp,
            Self::Cancelled(event) => event.timestamp,
        }
    }
}
