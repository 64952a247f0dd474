//! Order level within the four-level execution hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Level of an order node in the tree.
///
/// Levels are strictly increasing by one from parent to child:
/// Client (0) -> AlgoParent (1) -> Slice (2) -> Route (3).
/// Route nodes are leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderLevel {
    /// Level 0: the client order, root of the tree.
    Client,
    /// Level 1: the algo parent working the client order.
    AlgoParent,
    /// Level 2: a quantity released for one scheduling period.
    Slice,
    /// Level 3: one venue attempt; always a leaf.
    Route,
}

impl OrderLevel {
    /// Depth of this level in the tree (Client is 0).
    #[must_use]
    pub const fn depth(&self) -> u8 {
        match self {
            Self::Client => 0,
            Self::AlgoParent => 1,
            Self::Slice => 2,
            Self::Route => 3,
        }
    }

    /// The level a child of this node must have, if children are allowed.
    #[must_use]
    pub const fn child(&self) -> Option<Self> {
        match self {
            Self::Client => Some(Self::AlgoParent),
            Self::AlgoParent => Some(Self::Slice),
            Self::Slice => Some(Self::Route),
            Self::Route => None,
        }
    }

    /// The level a parent of this node must have.
    #[must_use]
    pub const fn parent(&self) -> Option<Self> {
        match self {
            Self::Client => None,
            Self::AlgoParent => Some(Self::Client),
            Self::Slice => Some(Self::AlgoParent),
            Self::Route => Some(Self::Slice),
        }
    }

    /// Returns true for leaf (Route) nodes.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Route)
    }
}

impl fmt::Display for OrderLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => write!(f, "CLIENT"),
            Self::AlgoParent => write!(f, "ALGO_PARENT"),
            Self::Slice => write!(f, "SLICE"),
            Self::Route => write!(f, "ROUTE"),
        }
    }
}
