//! Execution instructions carried by route orders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How aggressively a route order should execute at its venue.
///
/// Instructions form a ladder from most passive to most aggressive.
/// Retry passes escalate one rung at a time and saturate at `Sweep`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Instruction {
    /// Rest passively; never cross the spread.
    PostOnly,
    /// Priced immediate-or-cancel.
    LimitIoc,
    /// Marketable immediate-or-cancel.
    MarketIoc,
    /// Take all displayed liquidity up the book.
    Sweep,
}

impl Instruction {
    /// Next rung up the aggression ladder. `Sweep` stays `Sweep`.
    #[must_use]
    pub const fn escalated(&self) -> Self {
        match self {
            Self::PostOnly => Self::LimitIoc,
            Self::LimitIoc => Self::MarketIoc,
            Self::MarketIoc | Self::Sweep => Self::Sweep,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PostOnly => write!(f, "POST_ONLY"),
            Self::LimitIoc => write!(f, "LIMIT_IOC"),
            Self::MarketIoc => write!(f, "MARKET_IOC"),
            Self::Sweep => write!(f, "SWEEP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escalation_ladder() {
        assert_eq!(Instruction::PostOnly.escalated(), Instruction::LimitIoc);
        assert_eq!(Instruction::LimitIoc.escalated(), Instruction::MarketIoc);
        assert_eq!(Instruction::MarketIoc.escalated(), Instruction::Sweep);
    }

    #[test]
    fn sweep_saturates() {
        assert_eq!(Instruction::Sweep.escalated(), Instruction::Sweep);
        assert_eq!(Instruction::Sweep.escalated().escalated(), Instruction::Sweep);
    }

    #[test]
    fn aggression_ordering() {
        assert!(Instruction::PostOnly < Instruction::LimitIoc);
        assert!(Instruction::LimitIoc < Instruction::MarketIoc);
        assert!(Instruction::MarketIoc < Instruction::Sweep);
    }

    #[test]
    fn instruction_display() {
        assert_eq!(format!("{}", Instruction::PostOnly), "POST_ONLY");
        assert_eq!(format!("{}", Instruction::Sweep), "SWEEP");
    }
}
