// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Execution Simulator - Core Library
//!
//! Deterministic simulation of a four-level order execution hierarchy
//! (client order -> algo parent -> execution slice -> venue route) with
//! upward fill propagation and volume-weighted average pricing.
//!
//! # Architecture
//!
//! - **Domain**: the order graph and its invariants
//!   - `order_hierarchy`: Order aggregate, fill ledger, state machine,
//!     fill propagation service
//!   - `shared`: Money, Quantity, Symbol, Timestamp, typed identifiers
//! - **Scheduling**: participation curves, per-period expected targets,
//!   urgency classification
//! - **Venue**: probabilistic venue response model (fade / partial /
//!   reject / no-connection / fill) driven by an injected random source
//! - **Routing**: smart order router splitting slices across venues with
//!   bounded retry and instruction escalation
//! - **Recording**: append-only snapshot log (the "tick database")
//! - **Simulation**: the period loop tying everything together, plus the
//!   simulated clock
//!
//! Runs are reproducible: all randomness flows from a single seeded
//! generator injected into the venue response model, and all timestamps
//! come from the simulated clock.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Simulator configuration loading and validation.
pub mod config;

/// Domain layer - the order hierarchy and its invariants.
pub mod domain;

/// Append-only snapshot log (the tick database).
pub mod recording;

/// Smart order router with bounded retry.
pub mod routing;

/// Participation schedule planning and urgency classification.
pub mod scheduling;

/// Simulation engine, clock, and id allocation.
pub mod simulation;

/// Venue response model.
pub mod venue;

// Domain re-exports
pub use domain::order_hierarchy::{
    aggregate::{Order, OrderHierarchy},
    services::{FillPropagator, OrderStateMachine},
    value_objects::{
        CancelReason, Fill, FillLedger, Instruction, OrderLevel, OrderSide, OrderStatus,
        RejectReason, Urgency,
    },
};
pub use domain::shared::{ClientOrderId, FillId, Money, OrderId, Quantity, Symbol, Timestamp, VenueId};

// Component re-exports
pub use config::{ConfigError, SimulatorConfig, load_config};
pub use recording::{EventType, ExecutionRecord, ExecutionRecorder, RecordId};
pub use routing::{Router, SliceExecution};
pub use scheduling::{ParticipationCurve, ResidualPolicy, SessionSchedule};
pub use simulation::{ExecutionSimulator, SimClock, SimulationReport};
pub use venue::{Venue, VenueResponse, VenueResponseModel, VenueUniverse};
