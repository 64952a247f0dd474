//! Immutable fill facts.

use crate::domain::shared::{FillId, Money, OrderId, Quantity, Timestamp, VenueId};
use serde::{Deserialize, Serialize};

/// A single execution against a venue.
///
/// Fills are immutable facts. Once recorded at the route level the same
/// fill is applied, unchanged, at every ancestor level, so an aggregate
/// ledger can always be rebuilt from the route fills alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    fill_id: FillId,
    route_order_id: OrderId,
    quantity: Quantity,
    price: Money,
    venue: VenueId,
    executed_at: Timestamp,
}

impl Fill {
    /// Creates a fill fact with a fresh identifier.
    #[must_use]
    pub fn new(
        route_order_id: OrderId,
        quantity: Quantity,
        price: Money,
        venue: VenueId,
        executed_at: Timestamp,
    ) -> Self {
        Self {
            fill_id: FillId::generate(),
            route_order_id,
            quantity,
            price,
            venue,
            executed_at,
        }
    }

    /// Unique identifier of this fill.
    #[must_use]
    pub const fn fill_id(&self) -> &FillId {
        &self.fill_id
    }

    /// Route order this fill executed against.
    #[must_use]
    pub const fn route_order_id(&self) -> &OrderId {
        &self.route_order_id
    }

    /// Executed quantity.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Execution price.
    #[must_use]
    pub const fn price(&self) -> Money {
        self.price
    }

    /// Venue the fill printed on.
    #[must_use]
    pub const fn venue(&self) -> &VenueId {
        &self.venue
    }

    /// Execution time.
    #[must_use]
    pub const fn executed_at(&self) -> Timestamp {
        self.executed_at
    }

    /// Quantity times price.
    #[must_use]
    pub fn notional(&self) -> Money {
        self.price * self.quantity
    }
}
