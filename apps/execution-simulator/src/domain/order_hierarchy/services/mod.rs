//! Domain services for the order hierarchy.

mod fill_propagator;
mod order_state_machine;

pub use fill_propagator::{FillPropagator, PropagationOutcome};
pub use order_state_machine::OrderStateMachine;
