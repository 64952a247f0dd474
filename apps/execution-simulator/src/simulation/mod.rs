//! The simulation engine: the period loop, the simulated clock, and
//! sequential id allocation.

mod clock;
mod engine;
mod ids;
mod report;

pub use clock::SimClock;
pub use engine::ExecutionSimulator;
pub use ids::IdAllocator;
pub use report::SimulationReport;
