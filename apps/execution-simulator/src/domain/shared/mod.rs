//! Shared Domain Types
//!
//! Value objects shared across the crate.

pub mod value_objects;

pub use value_objects::{ClientOrderId, FillId, Money, OrderId, Quantity, Symbol, Timestamp, VenueId};
