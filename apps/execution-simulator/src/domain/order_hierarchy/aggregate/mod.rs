//! Aggregates for the order hierarchy domain.

mod hierarchy;
mod order;

pub use hierarchy::OrderHierarchy;
pub use order::Order;
