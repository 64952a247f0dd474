//! The tick database: append-only records of every state mutation.

mod record;
mod recorder;

pub use record::{EventType, ExecutionRecord, RecordId};
pub use recorder::ExecutionRecorder;
