//! Arena of orders forming one execution hierarchy.

use super::order::Order;
use crate::domain::order_hierarchy::errors::OrderHierarchyError;
use crate::domain::order_hierarchy::value_objects::OrderLevel;
use crate::domain::shared::{OrderId, Quantity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All orders of one client order's execution, indexed by id.
///
/// The arena owns every order; parent-child links are ids, not
/// references, so orders at different levels can be mutated in turn
/// without borrow gymnastics. A child index keeps insertion order per
/// parent, which makes traversal deterministic even though the backing
/// map is hashed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHierarchy {
    orders: HashMap<OrderId, Order>,
    children: HashMap<OrderId, Vec<OrderId>>,
    root: OrderId,
}

impl OrderHierarchy {
    /// Creates a hierarchy rooted at a client order.
    ///
    /// # Errors
    ///
    /// Returns an error if the root order is not a client-level order.
    pub fn new(client_order: Order) -> Result<Self, OrderHierarchyError> {
        if client_order.level() != OrderLevel::Client {
            return Err(OrderHierarchyError::LevelMismatch {
                expected: OrderLevel::Client,
                actual: client_order.level(),
            });
        }
        let root = client_order.order_id().clone();
        let mut orders = HashMap::new();
        orders.insert(root.clone(), client_order);
        Ok(Self {
            orders,
            children: HashMap::new(),
            root,
        })
    }

    /// Inserts a child order under its parent.
    ///
    /// # Errors
    ///
    /// Returns an error if the id already exists, the parent is
    /// missing, the levels do not chain, or the child does not share
    /// the hierarchy's client order id and root order id.
    pub fn insert_child(&mut self, child: Order) -> Result<(), OrderHierarchyError> {
        if self.orders.contains_key(child.order_id()) {
            return Err(OrderHierarchyError::DuplicateOrderId(
                child.order_id().clone(),
            ));
        }
        let parent_id = child
            .parent_order_id()
            .ok_or_else(|| {
                OrderHierarchyError::InvalidParameters(format!(
                    "order {} has no parent and cannot be inserted as a child",
                    child.order_id()
                ))
            })?
            .clone();
        let parent = self
            .orders
            .get(&parent_id)
            .ok_or_else(|| OrderHierarchyError::NotFound(parent_id.clone()))?;

        let expected_level = parent.level().child().ok_or_else(|| {
            OrderHierarchyError::InvalidParameters(format!(
                "orders at level {} cannot take children",
                parent.level()
            ))
        })?;
        if child.level() != expected_level {
            return Err(OrderHierarchyError::LevelMismatch {
                expected: expected_level,
                actual: child.level(),
            });
        }
        if child.client_order_id() != parent.client_order_id() {
            return Err(OrderHierarchyError::InvariantViolation(format!(
                "order {} carries client order id {}, hierarchy uses {}",
                child.order_id(),
                child.client_order_id(),
                parent.client_order_id()
            )));
        }
        if child.root_order_id() != &self.root {
            return Err(OrderHierarchyError::InvariantViolation(format!(
                "order {} carries root order id {}, hierarchy is rooted at {}",
                child.order_id(),
                child.root_order_id(),
                self.root
            )));
        }

        self.children
            .entry(parent_id)
            .or_default()
            .push(child.order_id().clone());
        self.orders.insert(child.order_id().clone(), child);
        Ok(())
    }

    /// Looks up an order by id.
    #[must_use]
    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.get(order_id)
    }

    /// Looks up an order by id for mutation.
    pub fn get_mut(&mut self, order_id: &OrderId) -> Option<&mut Order> {
        self.orders.get_mut(order_id)
    }

    /// True if an order with this id exists.
    #[must_use]
    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.orders.contains_key(order_id)
    }

    /// Identifier of the root client order.
    #[must_use]
    pub const fn root_id(&self) -> &OrderId {
        &self.root
    }

    /// Child ids of an order, in insertion order.
    #[must_use]
    pub fn children_of(&self, order_id: &OrderId) -> &[OrderId] {
        self.children.get(order_id).map_or(&[], Vec::as_slice)
    }

    /// Number of orders in the hierarchy.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// True if the hierarchy holds no orders. Never the case once
    /// constructed, but paired with [`Self::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Iterates over all orders in unspecified order.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    /// Ids of every order in deterministic preorder, root first,
    /// children in insertion order.
    #[must_use]
    pub fn depth_first_ids(&self) -> Vec<OrderId> {
        let mut out = Vec::with_capacity(self.orders.len());
        let mut stack = vec![self.root.clone()];
        while let Some(order_id) = stack.pop() {
            if let Some(children) = self.children.get(&order_id) {
                for child in children.iter().rev() {
                    stack.push(child.clone());
                }
            }
            out.push(order_id);
        }
        out
    }

    /// Verifies the accounting invariants across the whole tree.
    ///
    /// For every order, `filled + remaining == quantity` holds, the
    /// stored average price equals one rederived from the raw fill
    /// log, and the filled quantity of any order with children equals
    /// the sum over its children.
    ///
    /// # Errors
    ///
    /// Returns [`OrderHierarchyError::InvariantViolation`] naming the
    /// first order that fails.
    pub fn audit(&self) -> Result<(), OrderHierarchyError> {
        for order_id in self.depth_first_ids() {
            let order = self
                .orders
                .get(&order_id)
                .ok_or_else(|| OrderHierarchyError::NotFound(order_id.clone()))?;

            if !order.ledger().verify_conservation() {
                return Err(OrderHierarchyError::InvariantViolation(format!(
                    "filled + remaining != quantity for {order_id}"
                )));
            }
            if order.ledger().recompute_average() != order.average_price() {
                return Err(OrderHierarchyError::InvariantViolation(format!(
                    "stored average price of {order_id} diverges from its fill log"
                )));
            }

            let children = self.children_of(&order_id);
            if !children.is_empty() {
                let mut child_sum = Quantity::ZERO;
                for child_id in children {
                    let child = self
                        .orders
                        .get(child_id)
                        .ok_or_else(|| OrderHierarchyError::NotFound(child_id.clone()))?;
                    child_sum += child.filled_quantity();
                }
                if child_sum != order.filled_quantity() {
                    return Err(OrderHierarchyError::InvariantViolation(format!(
                        "filled quantity of {order_id} ({}) does not equal the sum over its children ({child_sum})",
                        order.filled_quantity()
                    )));
                }
            }
        }
        Ok(())
    }
}
