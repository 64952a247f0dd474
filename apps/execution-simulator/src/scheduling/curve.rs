//! Participation curve shapes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// How the target quantity is distributed across schedule periods.
///
/// Built-in shapes are generated for any period count; `Custom` takes
/// explicit weights, one per period, which are normalized before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipationCurve {
    /// Equal weight in every period.
    Uniform,
    /// Heavier at the open, tapering linearly.
    FrontLoaded,
    /// Lighter at the open, ramping linearly into the close.
    BackLoaded,
    /// Heavy at the open and close, light midday.
    UShaped,
    /// Explicit per-period weights.
    Custom(Vec<Decimal>),
}

impl ParticipationCurve {
    /// Builds a custom curve from raw weights.
    #[must_use]
    pub const fn custom(weights: Vec<Decimal>) -> Self {
        Self::Custom(weights)
    }

    /// Normalized per-period weights summing to one.
    ///
    /// # Panics
    ///
    /// Panics if `periods` is zero, or for `Custom` when the stored
    /// weight count does not match `periods` or the weights do not sum
    /// to a positive value. Configuration validation rejects both
    /// before a curve is ever built.
    #[must_use]
    pub fn weights(&self, periods: usize) -> Vec<Decimal> {
        assert!(periods > 0, "schedule needs at least one period");
        let raw: Vec<Decimal> = match self {
            Self::Uniform => vec![Decimal::ONE; periods],
            Self::FrontLoaded => (0..periods)
                .map(|period| Decimal::from((periods - period) as u64))
                .collect(),
            Self::BackLoaded => (0..periods)
                .map(|period| Decimal::from(period as u64 + 1))
                .collect(),
            Self::UShaped => Self::u_shaped_raw(periods),
            Self::Custom(weights) => {
                assert!(
                    weights.len() == periods,
                    "custom curve has {} weights for {periods} periods",
                    weights.len()
                );
                weights.clone()
            }
        };
        let sum: Decimal = raw.iter().sum();
        assert!(sum > Decimal::ZERO, "curve weights must sum to a positive value");
        raw.into_iter().map(|weight| weight / sum).collect()
    }

    /// Parabolic weights: heaviest at both ends, lightest in the
    /// middle, floored so midday periods still trade.
    fn u_shaped_raw(periods: usize) -> Vec<Decimal> {
        if periods == 1 {
            return vec![Decimal::ONE];
        }
        let span = Decimal::from(periods as u64 - 1);
        (0..periods)
            .map(|period| {
                let position = (Decimal::from(period as u64) * dec!(2) - span) / span;
                position * position + dec!(0.5)
            })
            .collect()
    }
}
