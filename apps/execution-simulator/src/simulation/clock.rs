//! The simulated clock.

use crate::domain::shared::Timestamp;

/// Monotonic simulated time.
///
/// Every timestamp in a run comes from this clock; wall-clock time is
/// never consulted, so two runs from the same configuration produce
/// identical timestamps. The clock only moves forward: stepping adds a
/// fixed latency, advancing snaps to a later point and ignores earlier
/// ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimClock {
    now: Timestamp,
}

impl SimClock {
    /// Creates a clock at the session start.
    #[must_use]
    pub const fn new(start: Timestamp) -> Self {
        Self { now: start }
    }

    /// Current simulated time.
    #[must_use]
    pub const fn now(&self) -> Timestamp {
        self.now
    }

    /// Moves the clock forward and returns the new time.
    pub fn step(&mut self, millis: i64) -> Timestamp {
        self.now = self.now.plus_millis(millis);
        self.now
    }

    /// Moves the clock to `at` if that is later than now.
    pub fn advance_to(&mut self, at: Timestamp) -> Timestamp {
        if at > self.now {
            self.now = at;
        }
        self.now
    }
}
