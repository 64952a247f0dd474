//! Slice routing across venues.

mod router;

pub use router::{Router, SliceExecution};
