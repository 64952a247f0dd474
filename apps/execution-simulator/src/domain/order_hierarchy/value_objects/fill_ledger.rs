//! Per-order fill accounting.

use super::fill::Fill;
use crate::domain::order_hierarchy::errors::OrderHierarchyError;
use crate::domain::shared::{Money, Quantity, Timestamp};
use serde::{Deserialize, Serialize};

/// Running fill totals for a single order.
///
/// The ledger maintains the conservation invariant
/// `cumulative + leaves == order quantity` and keeps every applied fill
/// so the weighted average price can always be rederived from the raw
/// fill log. The average is recomputed from the notional sum on every
/// apply rather than updated incrementally, which makes the stored
/// value bit-identical to a fresh recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillLedger {
    order_quantity: Quantity,
    cumulative_quantity: Quantity,
    leaves_quantity: Quantity,
    filled_notional: Money,
    average_price: Option<Money>,
    last_fill_at: Option<Timestamp>,
    fills: Vec<Fill>,
}

impl FillLedger {
    /// Creates an empty ledger for an order of the given quantity.
    #[must_use]
    pub const fn new(order_quantity: Quantity) -> Self {
        Self {
            order_quantity,
            cumulative_quantity: Quantity::ZERO,
            leaves_quantity: order_quantity,
            filled_notional: Money::ZERO,
            average_price: None,
            last_fill_at: None,
            fills: Vec::new(),
        }
    }

    /// Applies a fill to the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the fill quantity is not positive or exceeds
    /// the remaining quantity.
    pub fn apply(&mut self, fill: &Fill) -> Result<(), OrderHierarchyError> {
        if !fill.quantity().is_positive() {
            return Err(OrderHierarchyError::InvalidParameters(format!(
                "fill quantity must be positive, got {}",
                fill.quantity()
            )));
        }
        if fill.quantity() > self.leaves_quantity {
            return Err(OrderHierarchyError::FillExceedsRemaining {
                fill_quantity: fill.quantity(),
                leaves_quantity: self.leaves_quantity,
            });
        }

        self.cumulative_quantity += fill.quantity();
        self.leaves_quantity -= fill.quantity();
        self.filled_notional += fill.notional();
        self.average_price = Some(self.filled_notional / self.cumulative_quantity);
        self.last_fill_at = Some(fill.executed_at());
        self.fills.push(fill.clone());
        Ok(())
    }

    /// Total quantity of the order this ledger tracks.
    #[must_use]
    pub const fn order_quantity(&self) -> Quantity {
        self.order_quantity
    }

    /// Quantity filled so far.
    #[must_use]
    pub const fn cumulative_quantity(&self) -> Quantity {
        self.cumulative_quantity
    }

    /// Quantity still open.
    #[must_use]
    pub const fn leaves_quantity(&self) -> Quantity {
        self.leaves_quantity
    }

    /// Sum of quantity times price across all fills.
    #[must_use]
    pub const fn filled_notional(&self) -> Money {
        self.filled_notional
    }

    /// Volume-weighted average fill price, if any fills have applied.
    #[must_use]
    pub const fn average_price(&self) -> Option<Money> {
        self.average_price
    }

    /// Time of the most recent fill.
    #[must_use]
    pub const fn last_fill_at(&self) -> Option<Timestamp> {
        self.last_fill_at
    }

    /// All fills applied to this ledger, in application order.
    #[must_use]
    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    /// True once the full order quantity has filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.leaves_quantity.is_zero()
    }

    /// Rederives the average price from the raw fill log.
    ///
    /// Always equals [`Self::average_price`]; the audit path uses this
    /// to prove the stored totals were not corrupted.
    #[must_use]
    pub fn recompute_average(&self) -> Option<Money> {
        if self.fills.is_empty() {
            return None;
        }
        let total_quantity = self
            .fills
            .iter()
            .fold(Quantity::ZERO, |acc, fill| acc + fill.quantity());
        let total_notional = self
            .fills
            .iter()
            .fold(Money::ZERO, |acc, fill| acc + fill.notional());
        Some(total_notional / total_quantity)
    }

    /// Checks the conservation invariant against the raw fill log.
    #[must_use]
    pub fn verify_conservation(&self) -> bool {
        let summed = self
            .fills
            .iter()
            .fold(Quantity::ZERO, |acc, fill| acc + fill.quantity());
        self.cumulative_quantity + self.leaves_quantity == self.order_quantity
            && summed == self.cumulative_quantity
    }
}
