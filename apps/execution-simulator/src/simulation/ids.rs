//! Sequential order id allocation.

use crate::domain::shared::OrderId;

/// Hands out order ids in the shape downstream systems expect:
/// `ALGO_00001`, `SLICE_00001`, `SOR_00001`, each sequence counting
/// independently from one.
#[derive(Debug, Default)]
pub struct IdAllocator {
    algo: u32,
    slice: u32,
    route: u32,
}

impl IdAllocator {
    /// Creates an allocator with all sequences at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            algo: 0,
            slice: 0,
            route: 0,
        }
    }

    /// Next algo parent id.
    pub fn next_algo(&mut self) -> OrderId {
        self.algo += 1;
        OrderId::new(format!("ALGO_{:05}", self.algo))
    }

    /// Next slice id.
    pub fn next_slice(&mut self) -> OrderId {
        self.slice += 1;
        OrderId::new(format!("SLICE_{:05}", self.slice))
    }

    /// Next route id.
    pub fn next_route(&mut self) -> OrderId {
        self.route += 1;
        OrderId::new(format!("SOR_{:05}", self.route))
    }
}
