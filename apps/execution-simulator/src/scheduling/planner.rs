//! Session schedule and slice sizing.

use super::curve::ParticipationCurve;
use crate::domain::order_hierarchy::value_objects::Urgency;
use crate::domain::shared::{Quantity, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// What to do with quantity the schedule failed to place in earlier
/// periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResidualPolicy {
    /// Fold the deficit into the current period's slice.
    #[default]
    CatchUp,
    /// Size each slice from its own allocation only and leave the
    /// deficit unfilled.
    Abandon,
}

/// Per-period execution targets for one algo parent.
///
/// Built once at the start of a run. The cumulative targets are whole
/// shares, nondecreasing, and the final period always carries the full
/// order quantity regardless of rounding in earlier periods.
#[derive(Debug, Clone)]
pub struct SessionSchedule {
    session_start: Timestamp,
    period_minutes: i64,
    total_quantity: Quantity,
    expected_cumulative: Vec<Quantity>,
}

impl SessionSchedule {
    /// Builds the schedule from a curve.
    ///
    /// # Panics
    ///
    /// Panics if `periods` is zero or the curve rejects the period
    /// count, both of which configuration validation rules out.
    #[must_use]
    pub fn build(
        curve: &ParticipationCurve,
        periods: usize,
        total_quantity: Quantity,
        session_start: Timestamp,
        period_minutes: i64,
    ) -> Self {
        let weights = curve.weights(periods);
        let mut expected_cumulative = Vec::with_capacity(periods);
        let mut cumulative_weight = Decimal::ZERO;
        for weight in &weights {
            cumulative_weight += weight;
            let target = (total_quantity.amount() * cumulative_weight).round();
            expected_cumulative.push(Quantity::new(target));
        }
        // Rounding must never make targets regress, and the final
        // period always carries the whole order.
        for period in 1..periods {
            if expected_cumulative[period] < expected_cumulative[period - 1] {
                expected_cumulative[period] = expected_cumulative[period - 1];
            }
        }
        expected_cumulative[periods - 1] = total_quantity;

        Self {
            session_start,
            period_minutes,
            total_quantity,
            expected_cumulative,
        }
    }

    /// Number of periods in the session.
    #[must_use]
    pub fn periods(&self) -> usize {
        self.expected_cumulative.len()
    }

    /// Total quantity the schedule places.
    #[must_use]
    pub const fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// Wall-clock start of a period.
    #[must_use]
    pub fn period_start(&self, period: usize) -> Timestamp {
        self.session_start
            .plus_millis(period as i64 * self.period_minutes * MILLIS_PER_MINUTE)
    }

    /// Cumulative quantity expected by the end of a period.
    #[must_use]
    pub fn expected_through(&self, period: usize) -> Quantity {
        self.expected_cumulative[period]
    }

    /// Cumulative quantity expected before a period starts. Zero for
    /// the first period.
    #[must_use]
    pub fn expected_before(&self, period: usize) -> Quantity {
        if period == 0 {
            Quantity::ZERO
        } else {
            self.expected_cumulative[period - 1]
        }
    }

    /// Participation rate at the start of a period: actual filled over
    /// the quantity the schedule expected by then. A period with no
    /// prior expectation reports exactly on schedule.
    #[must_use]
    pub fn participation_rate(&self, filled: Quantity, period: usize) -> Decimal {
        let expected = self.expected_before(period);
        if expected.is_zero() {
            Decimal::ONE
        } else {
            filled.amount() / expected.amount()
        }
    }

    /// Urgency classification at the start of a period.
    #[must_use]
    pub fn classify_urgency(&self, filled: Quantity, period: usize) -> Urgency {
        Urgency::from_participation_rate(self.participation_rate(filled, period))
    }

    /// Quantity the slice for this period should carry.
    ///
    /// Under [`ResidualPolicy::CatchUp`] the slice absorbs any deficit
    /// against the cumulative target; under [`ResidualPolicy::Abandon`]
    /// it takes the period's own allocation only. Either way the result
    /// is capped by the remaining order quantity, and a schedule that
    /// is already ahead yields zero, meaning no slice this period.
    #[must_use]
    pub fn slice_quantity(
        &self,
        filled: Quantity,
        remaining: Quantity,
        period: usize,
        policy: ResidualPolicy,
    ) -> Quantity {
        let raw = match policy {
            ResidualPolicy::CatchUp => {
                let target = self.expected_through(period);
                if filled >= target {
                    Quantity::ZERO
                } else {
                    target - filled
                }
            }
            ResidualPolicy::Abandon => self.expected_through(period) - self.expected_before(period),
        };
        raw.min(remaining)
    }
}
