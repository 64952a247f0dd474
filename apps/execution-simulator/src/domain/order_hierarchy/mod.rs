//! Order hierarchy domain: aggregates, events, services and value
//! objects for the four-level execution tree.

pub mod aggregate;
pub mod errors;
pub mod events;
pub mod services;
pub mod value_objects;
