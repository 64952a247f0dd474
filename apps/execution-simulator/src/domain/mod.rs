//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure
//! dependencies. This layer defines:
//!
//! - **Aggregates**: Consistency boundaries with invariants
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Events**: Records of state transitions
//! - **Domain Services**: Stateless business logic
//!
//! # Bounded Contexts
//!
//! - [`order_hierarchy`]: the four-level order tree, fill accounting, and
//!   the upward fill cascade
//! - [`shared`]: value objects used across the crate

pub mod order_hierarchy;
pub mod shared;
