//! Reject and cancel reasons.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a route order was rejected by its venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// Displayed liquidity disappeared before the order arrived.
    LiquidityFaded,
    /// The venue declined the order.
    VenueRejected {
        /// Venue that rejected.
        venue: String,
    },
    /// The session to the venue was down.
    NoConnection {
        /// Venue that was unreachable.
        venue: String,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LiquidityFaded => write!(f, "Liquidity taken by competitor"),
            Self::VenueRejected { venue } => write!(f, "Rejected by {venue}"),
            Self::NoConnection { venue } => write!(f, "No connection to {venue}-FIX-01"),
        }
    }
}

/// Why an order was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelReason {
    /// Explicit cancel request.
    UserRequested,
    /// Trading session ended with the order still open.
    SessionEnd,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserRequested => write!(f, "Cancelled on request"),
            Self::SessionEnd => write!(f, "Session ended"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_reason_text() {
        assert_eq!(
            format!("{}", RejectReason::LiquidityFaded),
            "Liquidity taken by competitor"
        );
    }

    #[test]
    fn no_connection_names_the_venue_session() {
        let reason = RejectReason::NoConnection {
            venue: "NYSE".to_string(),
        };
        assert_eq!(format!("{reason}"), "No connection to NYSE-FIX-01");
    }

    #[test]
    fn venue_reject_names_the_venue() {
        let reason = RejectReason::VenueRejected {
            venue: "DARK".to_string(),
        };
        assert_eq!(format!("{reason}"), "Rejected by DARK");
    }

    #[test]
    fn reject_reason_serde_is_tagged() {
        let reason = RejectReason::NoConnection {
            venue: "ARCA".to_string(),
        };
        let json = serde_json::to_string(&reason).unwrap();
        assert!(json.contains("\"NO_CONNECTION\""));
        assert!(json.contains("\"ARCA\""));
        let parsed: RejectReason = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reason);
    }

    #[test]
    fn cancel_reason_text() {
        assert_eq!(format!("{}", CancelReason::SessionEnd), "Session ended");
    }
}
