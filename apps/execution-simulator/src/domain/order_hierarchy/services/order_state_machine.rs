//! Order lifecycle state machine.

use crate::domain::order_hierarchy::errors::OrderHierarchyError;
use crate::domain::order_hierarchy::value_objects::OrderStatus;

/// Validates order lifecycle transitions.
///
/// The transition table is the single source of truth for which
/// lifecycle moves are legal. Rejection is only reachable from
/// `Accepted`: an order that has started working can no longer be
/// rejected, only cancelled or filled.
pub struct OrderStateMachine;

impl OrderStateMachine {
    /// Returns true if the transition is allowed.
    #[must_use]
    pub const fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            (OrderStatus::Pending, OrderStatus::Accepted)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Accepted, OrderStatus::Working)
                | (OrderStatus::Accepted, OrderStatus::Rejected)
                | (OrderStatus::Accepted, OrderStatus::Cancelled)
                | (OrderStatus::Working, OrderStatus::PartiallyFilled)
                | (OrderStatus::Working, OrderStatus::Filled)
                | (OrderStatus::Working, OrderStatus::Cancelled)
                | (OrderStatus::PartiallyFilled, OrderStatus::PartiallyFilled)
                | (OrderStatus::PartiallyFilled, OrderStatus::Filled)
                | (OrderStatus::PartiallyFilled, OrderStatus::Cancelled)
        )
    }

    /// Validates a transition, returning an error when forbidden.
    ///
    /// # Errors
    ///
    /// Returns [`OrderHierarchyError::InvalidStateTransition`] when the
    /// transition table does not allow the move.
    pub fn validate_transition(
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<(), OrderHierarchyError> {
        if Self::can_transition(from, to) {
            Ok(())
        } else {
            Err(OrderHierarchyError::InvalidStateTransition { from, to })
        }
    }
}
