//! Participation scheduling: curve shapes, per-period targets and
//! slice sizing.

mod curve;
mod planner;

pub use curve::ParticipationCurve;
pub use planner::{ResidualPolicy, SessionSchedule};
