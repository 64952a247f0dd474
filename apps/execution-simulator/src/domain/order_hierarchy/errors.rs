//! Errors for the order hierarchy domain.

use super::value_objects::{OrderLevel, OrderStatus};
use crate::domain::shared::{OrderId, Quantity};
use std::fmt;

/// Errors that can occur while building or mutating an order hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderHierarchyError {
    /// Attempted a lifecycle transition the state machine forbids.
    InvalidStateTransition {
        /// Status the order was in.
        from: OrderStatus,
        /// Status that was requested.
        to: OrderStatus,
    },
    /// Attempted to fill an order that cannot receive fills.
    CannotFill {
        /// Status the order was in.
        status: OrderStatus,
    },
    /// Attempted to cancel an order already in a terminal state.
    CannotCancel {
        /// Status the order was in.
        status: OrderStatus,
    },
    /// Fill quantity exceeds the order's remaining quantity.
    FillExceedsRemaining {
        /// Quantity of the offending fill.
        fill_quantity: Quantity,
        /// Open quantity at the time of the fill.
        leaves_quantity: Quantity,
    },
    /// Order parameters failed validation.
    InvalidParameters(String),
    /// An order was used at the wrong level of the hierarchy.
    LevelMismatch {
        /// Level required by the operation.
        expected: OrderLevel,
        /// Level the order actually has.
        actual: OrderLevel,
    },
    /// No order with the given identifier exists in the hierarchy.
    NotFound(OrderId),
    /// An order with the given identifier already exists.
    DuplicateOrderId(OrderId),
    /// A structural invariant of the hierarchy does not hold.
    InvariantViolation(String),
}

impl fmt::Display for OrderHierarchyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStateTransition { from, to } => {
                write!(f, "Invalid state transition from {from} to {to}")
            }
            Self::CannotFill { status } => {
                write!(f, "Cannot fill order in status {status}")
            }
            Self::CannotCancel { status } => {
                write!(f, "Cannot cancel order in status {status}")
            }
            Self::FillExceedsRemaining {
                fill_quantity,
                leaves_quantity,
            } => {
                write!(
                    f,
                    "Fill quantity {fill_quantity} exceeds remaining quantity {leaves_quantity}"
                )
            }
            Self::InvalidParameters(message) => {
                write!(f, "Invalid order parameters: {message}")
            }
            Self::LevelMismatch { expected, actual } => {
                write!(f, "Expected order at level {expected}, got {actual}")
            }
            Self::NotFound(order_id) => {
                write!(f, "Order not found: {order_id}")
            }
            Self::DuplicateOrderId(order_id) => {
                write!(f, "Order already exists: {order_id}")
            }
            Self::InvariantViolation(message) => {
                write!(f, "Hierarchy invariant violated: {message}")
            }
        }
    }
}

impl std::error::Error for OrderHierarchyError {}
