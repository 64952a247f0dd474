//! The order aggregate.

use crate::domain::order_hierarchy::errors::OrderHierarchyError;
use crate::domain::order_hierarchy::events::{
    OrderAccepted, OrderCancelled, OrderEvent, OrderFilled, OrderPartiallyFilled, OrderRejected,
    OrderSubmitted,
};
use crate::domain::order_hierarchy::services::OrderStateMachine;
use crate::domain::order_hierarchy::value_objects::{
    CancelReason, Fill, FillLedger, Instruction, OrderLevel, OrderSide, OrderStatus, RejectReason,
    Urgency,
};
use crate::domain::shared::{ClientOrderId, Money, OrderId, Quantity, Symbol, Timestamp, VenueId};
use serde::{Deserialize, Serialize};

/// An order at one level of the execution hierarchy.
///
/// Orders are created through the level-specific constructors, which
/// enforce the parent-child rules: an algo parent hangs off a client
/// order, slices hang off the algo parent, routes hang off a slice.
/// Every child inherits symbol, side, client order id and root order id
/// from its parent, and its quantity may not exceed the parent's open
/// quantity at creation time.
///
/// Lifecycle transitions go through [`OrderStateMachine`] and each one
/// pushes a domain event; callers drain the events after every
/// operation and hand them to the recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    order_id: OrderId,
    client_order_id: ClientOrderId,
    root_order_id: OrderId,
    parent_order_id: Option<OrderId>,
    level: OrderLevel,
    symbol: Symbol,
    side: OrderSide,
    quantity: Quantity,
    status: OrderStatus,
    ledger: FillLedger,
    urgency: Option<Urgency>,
    instruction: Option<Instruction>,
    venue: Option<VenueId>,
    attempt: Option<u32>,
    reject_reason: Option<RejectReason>,
    cancel_reason: Option<CancelReason>,
    created_at: Timestamp,
    updated_at: Timestamp,
    #[serde(skip)]
    events: Vec<OrderEvent>,
}

impl Order {
    /// Creates the client order at the root of a hierarchy.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol is empty or the quantity is not
    /// positive.
    pub fn client(
        order_id: OrderId,
        client_order_id: ClientOrderId,
        symbol: Symbol,
        side: OrderSide,
        quantity: Quantity,
        at: Timestamp,
    ) -> Result<Self, OrderHierarchyError> {
        if symbol.is_empty() {
            return Err(OrderHierarchyError::InvalidParameters(
                "symbol must not be empty".to_string(),
            ));
        }
        if !quantity.is_positive() {
            return Err(OrderHierarchyError::InvalidParameters(format!(
                "order quantity must be positive, got {quantity}"
            )));
        }
        let root_order_id = order_id.clone();
        Ok(Self::submit(
            order_id,
            client_order_id,
            root_order_id,
            None,
            OrderLevel::Client,
            symbol,
            side,
            quantity,
            at,
        ))
    }

    /// Creates the algo parent under a client order.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent is not an active client order or
    /// the quantity is invalid.
    pub fn algo_parent(
        order_id: OrderId,
        parent: &Self,
        quantity: Quantity,
        at: Timestamp,
    ) -> Result<Self, OrderHierarchyError> {
        Self::validate_child(parent, OrderLevel::Client, quantity)?;
        Ok(Self::submit(
            order_id,
            parent.client_order_id.clone(),
            parent.root_order_id.clone(),
            Some(parent.order_id.clone()),
            OrderLevel::AlgoParent,
            parent.symbol.clone(),
            parent.side,
            quantity,
            at,
        ))
    }

    /// Creates a slice under the algo parent for one schedule period.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent is not an active algo parent or
    /// the quantity is invalid.
    pub fn slice(
        order_id: OrderId,
        parent: &Self,
        quantity: Quantity,
        urgency: Urgency,
        at: Timestamp,
    ) -> Result<Self, OrderHierarchyError> {
        Self::validate_child(parent, OrderLevel::AlgoParent, quantity)?;
        let mut order = Self::submit(
            order_id,
            parent.client_order_id.clone(),
            parent.root_order_id.clone(),
            Some(parent.order_id.clone()),
            OrderLevel::Slice,
            parent.symbol.clone(),
            parent.side,
            quantity,
            at,
        );
        order.urgency = Some(urgency);
        Ok(order)
    }

    /// Creates a route under a slice, bound to one venue. `attempt` is
    /// the 1-based router pass that created the route.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent is not an active slice or the
    /// quantity is invalid.
    pub fn route(
        order_id: OrderId,
        parent: &Self,
        quantity: Quantity,
        venue: VenueId,
        instruction: Instruction,
        attempt: u32,
        at: Timestamp,
    ) -> Result<Self, OrderHierarchyError> {
        Self::validate_child(parent, OrderLevel::Slice, quantity)?;
        let mut order = Self::submit(
            order_id,
            parent.client_order_id.clone(),
            parent.root_order_id.clone(),
            Some(parent.order_id.clone()),
            OrderLevel::Route,
            parent.symbol.clone(),
            parent.side,
            quantity,
            at,
        );
        order.urgency = parent.urgency;
        order.instruction = Some(instruction);
        order.venue = Some(venue);
        order.attempt = Some(attempt);
        Ok(order)
    }

    fn validate_child(
        parent: &Self,
        expected_parent_level: OrderLevel,
        quantity: Quantity,
    ) -> Result<(), OrderHierarchyError> {
        if parent.level != expected_parent_level {
            return Err(OrderHierarchyError::LevelMismatch {
                expected: expected_parent_level,
                actual: parent.level,
            });
        }
        if !parent.status.is_active() {
            return Err(OrderHierarchyError::InvalidParameters(format!(
                "parent order {} is {} and cannot take children",
                parent.order_id, parent.status
            )));
        }
        if !quantity.is_positive() {
            return Err(OrderHierarchyError::InvalidParameters(format!(
                "order quantity must be positive, got {quantity}"
            )));
        }
        if quantity > parent.ledger.leaves_quantity() {
            return Err(OrderHierarchyError::InvalidParameters(format!(
                "child quantity {quantity} exceeds parent remaining {}",
                parent.ledger.leaves_quantity()
            )));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn submit(
        order_id: OrderId,
        client_order_id: ClientOrderId,
        root_order_id: OrderId,
        parent_order_id: Option<OrderId>,
        level: OrderLevel,
        symbol: Symbol,
        side: OrderSide,
        quantity: Quantity,
        at: Timestamp,
    ) -> Self {
        let event = OrderEvent::Submitted(OrderSubmitted {
            order_id: order_id.clone(),
            level,
            symbol: symbol.clone(),
            side,
            quantity,
            timestamp: at,
        });
        Self {
            order_id,
            client_order_id,
            root_order_id,
            parent_order_id,
            level,
            symbol,
            side,
            quantity,
            status: OrderStatus::Pending,
            ledger: FillLedger::new(quantity),
            urgency: None,
            instruction: None,
            venue: None,
            attempt: None,
            reject_reason: None,
            cancel_reason: None,
            created_at: at,
            updated_at: at,
            events: vec![event],
        }
    }

    /// Acknowledges the order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not pending.
    pub fn accept(&mut self, at: Timestamp) -> Result<(), OrderHierarchyError> {
        OrderStateMachine::validate_transition(self.status, OrderStatus::Accepted)?;
        self.status = OrderStatus::Accepted;
        self.updated_at = at;
        self.events.push(OrderEvent::Accepted(OrderAccepted {
            order_id: self.order_id.clone(),
            level: self.level,
            timestamp: at,
        }));
        Ok(())
    }

    /// Moves the order to working. Emits no event; the working
    /// transition is bookkeeping, not an execution report.
    ///
    /// # Errors
    ///
    /// Returns an error if the order has not been accepted.
    pub fn start_working(&mut self, at: Timestamp) -> Result<(), OrderHierarchyError> {
        OrderStateMachine::validate_transition(self.status, OrderStatus::Working)?;
        self.status = OrderStatus::Working;
        self.updated_at = at;
        Ok(())
    }

    /// Applies a fill and advances the status to partially filled or
    /// filled depending on the remaining quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot receive fills or the fill
    /// exceeds the remaining quantity.
    pub fn apply_fill(&mut self, fill: &Fill, at: Timestamp) -> Result<(), OrderHierarchyError> {
        if !self.status.can_fill() {
            return Err(OrderHierarchyError::CannotFill {
                status: self.status,
            });
        }
        self.ledger.apply(fill)?;
        let average_price = self.ledger.average_price().unwrap_or_else(|| fill.price());

        if self.ledger.is_complete() {
            OrderStateMachine::validate_transition(self.status, OrderStatus::Filled)?;
            self.status = OrderStatus::Filled;
            self.events.push(OrderEvent::Filled(OrderFilled {
                order_id: self.order_id.clone(),
                level: self.level,
                fill_quantity: fill.quantity(),
                fill_price: fill.price(),
                venue: fill.venue().clone(),
                cumulative_quantity: self.ledger.cumulative_quantity(),
                average_price,
                timestamp: at,
            }));
        } else {
            OrderStateMachine::validate_transition(self.status, OrderStatus::PartiallyFilled)?;
            self.status = OrderStatus::PartiallyFilled;
            self.events
                .push(OrderEvent::PartiallyFilled(OrderPartiallyFilled {
                    order_id: self.order_id.clone(),
                    level: self.level,
                    fill_quantity: fill.quantity(),
                    fill_price: fill.price(),
                    venue: fill.venue().clone(),
                    cumulative_quantity: self.ledger.cumulative_quantity(),
                    leaves_quantity: self.ledger.leaves_quantity(),
                    average_price,
                    timestamp: at,
                }));
        }
        self.updated_at = at;
        Ok(())
    }

    /// Rejects the order.
    ///
    /// Rejection is a creation-time outcome: it is only reachable from
    /// `Accepted`, before the order starts working, so a rejected order
    /// always has zero fills.
    ///
    /// # Errors
    ///
    /// Returns an error if the order has already started working or is
    /// terminal.
    pub fn reject(&mut self, reason: RejectReason, at: Timestamp) -> Result<(), OrderHierarchyError> {
        OrderStateMachine::validate_transition(self.status, OrderStatus::Rejected)?;
        self.status = OrderStatus::Rejected;
        self.reject_reason = Some(reason.clone());
        self.updated_at = at;
        self.events.push(OrderEvent::Rejected(OrderRejected {
            order_id: self.order_id.clone(),
            level: self.level,
            reason,
            timestamp: at,
        }));
        Ok(())
    }

    /// Cancels the order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is already terminal.
    pub fn cancel(&mut self, reason: CancelReason, at: Timestamp) -> Result<(), OrderHierarchyError> {
        if self.status.is_terminal() {
            return Err(OrderHierarchyError::CannotCancel {
                status: self.status,
            });
        }
        OrderStateMachine::validate_transition(self.status, OrderStatus::Cancelled)?;
        self.status = OrderStatus::Cancelled;
        self.cancel_reason = Some(reason);
        self.updated_at = at;
        self.events.push(OrderEvent::Cancelled(OrderCancelled {
            order_id: self.order_id.clone(),
            level: self.level,
            reason,
            leaves_quantity: self.ledger.leaves_quantity(),
            timestamp: at,
        }));
        Ok(())
    }

    /// Takes all pending domain events, leaving the list empty.
    pub fn drain_events(&mut self) -> Vec<OrderEvent> {
        std::mem::take(&mut self.events)
    }

    /// Order identifier.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Client-assigned identifier, shared by the whole hierarchy.
    #[must_use]
    pub const fn client_order_id(&self) -> &ClientOrderId {
        &self.client_order_id
    }

    /// Identifier of the hierarchy's root order.
    #[must_use]
    pub const fn root_order_id(&self) -> &OrderId {
        &self.root_order_id
    }

    /// Identifier of the parent order, `None` at the root.
    #[must_use]
    pub const fn parent_order_id(&self) -> Option<&OrderId> {
        self.parent_order_id.as_ref()
    }

    /// Hierarchy level.
    #[must_use]
    pub const fn level(&self) -> OrderLevel {
        self.level
    }

    /// Traded symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Order side.
    #[must_use]
    pub const fn side(&self) -> OrderSide {
        self.side
    }

    /// Total order quantity.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Fill accounting for this order.
    #[must_use]
    pub const fn ledger(&self) -> &FillLedger {
        &self.ledger
    }

    /// Quantity filled so far.
    #[must_use]
    pub const fn filled_quantity(&self) -> Quantity {
        self.ledger.cumulative_quantity()
    }

    /// Quantity still open.
    #[must_use]
    pub const fn remaining_quantity(&self) -> Quantity {
        self.ledger.leaves_quantity()
    }

    /// Volume-weighted average fill price, if any fills have applied.
    #[must_use]
    pub const fn average_price(&self) -> Option<Money> {
        self.ledger.average_price()
    }

    /// Urgency, present on slices and their routes.
    #[must_use]
    pub const fn urgency(&self) -> Option<Urgency> {
        self.urgency
    }

    /// Execution instruction, present on routes.
    #[must_use]
    pub const fn instruction(&self) -> Option<Instruction> {
        self.instruction
    }

    /// Target venue, present on routes.
    #[must_use]
    pub const fn venue(&self) -> Option<&VenueId> {
        self.venue.as_ref()
    }

    /// Router pass that created this route, 1-based.
    #[must_use]
    pub const fn attempt(&self) -> Option<u32> {
        self.attempt
    }

    /// Reject reason, present once rejected.
    #[must_use]
    pub const fn reject_reason(&self) -> Option<&RejectReason> {
        self.reject_reason.as_ref()
    }

    /// Cancel reason, present once cancelled.
    #[must_use]
    pub const fn cancel_reason(&self) -> Option<&CancelReason> {
        self.cancel_reason.as_ref()
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Time of the most recent mutation.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}
