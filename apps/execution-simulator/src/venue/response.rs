//! Venue responses to route orders.

use crate::domain::shared::{Money, Quantity};

/// What a venue did with a route order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenueResponse {
    /// Full execution at the given price.
    Fill {
        /// Executed quantity, the route's whole quantity.
        quantity: Quantity,
        /// Execution price.
        price: Money,
    },
    /// Partial execution; the rest of the route's quantity is gone.
    Partial {
        /// Executed quantity.
        quantity: Quantity,
        /// Execution price.
        price: Money,
    },
    /// Displayed liquidity disappeared before the order arrived.
    Fade,
    /// The venue declined the order.
    Reject,
    /// The session to the venue was down.
    NoConnection,
}

impl VenueResponse {
    /// Executed quantity and price, when the response is an execution.
    #[must_use]
    pub const fn execution(&self) -> Option<(Quantity, Money)> {
        match self {
            Self::Fill { quantity, price } | Self::Partial { quantity, price } => {
                Some((*quantity, *price))
            }
            Self::Fade | Self::Reject | Self::NoConnection => None,
        }
    }
}
