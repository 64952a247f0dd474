//! Run summary.

use serde::Serialize;

use crate::domain::order_hierarchy::value_objects::{OrderSide, OrderStatus};
use crate::domain::shared::{Money, Quantity, Symbol};

/// Final figures for one simulated session.
///
/// Mirrors the client order after the last period, with the run's
/// volume counters alongside.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Ticker the session executed.
    pub symbol: Symbol,
    /// Order side.
    pub side: OrderSide,
    /// Final state of the client order.
    pub final_status: OrderStatus,
    /// Quantity the client asked for.
    pub total_quantity: Quantity,
    /// Quantity executed.
    pub filled_quantity: Quantity,
    /// Quantity left open.
    pub remaining_quantity: Quantity,
    /// Volume-weighted average fill price, when anything filled.
    pub average_price: Option<Money>,
    /// Slices the schedule released.
    pub slices_released: usize,
    /// Route orders created across all passes.
    pub routes_created: usize,
    /// Snapshot records written to the execution log.
    pub records_written: usize,
}

impl SimulationReport {
    /// True when the client order executed in full.
    #[must_use]
    pub fn is_fully_filled(&self) -> bool {
        self.final_status == OrderStatus::Filled && self.remaining_quantity.is_zero()
    }
}
