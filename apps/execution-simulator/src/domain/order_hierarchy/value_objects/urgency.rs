//! Urgency classification derived from schedule adherence.

use super::instruction::Instruction;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Urgency of a slice relative to its participation schedule.
///
/// Classified from the participation rate (actual filled over expected
/// cumulative quantity) at the start of each period. Band edges are
/// inclusive on the lower bound: a rate of exactly 95% is `Passive`,
/// exactly 85% is `Normal`, exactly 70% is `Urgent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    /// At or ahead of schedule (rate >= 95%).
    Passive,
    /// Slightly behind (85% <= rate < 95%).
    Normal,
    /// Meaningfully behind (70% <= rate < 85%).
    Urgent,
    /// Far behind schedule (rate < 70%).
    Critical,
}

impl Urgency {
    const PASSIVE_FLOOR: Decimal = dec!(0.95);
    const NORMAL_FLOOR: Decimal = dec!(0.85);
    const URGENT_FLOOR: Decimal = dec!(0.70);

    /// Classifies a participation rate, expressed as a fraction where
    /// `1.0` means exactly on schedule.
    #[must_use]
    pub fn from_participation_rate(rate: Decimal) -> Self {
        if rate >= Self::PASSIVE_FLOOR {
            Self::Passive
        } else if rate >= Self::NORMAL_FLOOR {
            Self::Normal
        } else if rate >= Self::URGENT_FLOOR {
            Self::Urgent
        } else {
            Self::Critical
        }
    }

    /// Execution instruction this urgency maps to.
    #[must_use]
    pub const fn instruction(&self) -> Instruction {
        match self {
            Self::Passive => Instruction::PostOnly,
            Self::Normal => Instruction::LimitIoc,
            Self::Urgent => Instruction::MarketIoc,
            Self::Critical => Instruction::Sweep,
        }
    }

    /// Number of venues a slice at this urgency is routed across.
    #[must_use]
    pub const fn venue_count(&self) -> usize {
        match self {
            Self::Passive | Self::Normal => 2,
            Self::Urgent | Self::Critical => 3,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passive => write!(f, "PASSIVE"),
            Self::Normal => write!(f, "NORMAL"),
            Self::Urgent => write!(f, "URGENT"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
