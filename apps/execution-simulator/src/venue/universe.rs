//! Venues and the venue universe.

use crate::domain::shared::VenueId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One execution venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    venue_id: VenueId,
    base_liquidity: u64,
    fade_probability: f64,
}

impl Venue {
    /// Creates a venue.
    #[must_use]
    pub const fn new(venue_id: VenueId, base_liquidity: u64, fade_probability: f64) -> Self {
        Self {
            venue_id,
            base_liquidity,
            fade_probability,
        }
    }

    /// Venue identifier.
    #[must_use]
    pub const fn venue_id(&self) -> &VenueId {
        &self.venue_id
    }

    /// Displayed liquidity used for ranking and allocation.
    #[must_use]
    pub const fn base_liquidity(&self) -> u64 {
        self.base_liquidity
    }

    /// Probability that displayed liquidity fades before an order
    /// arrives.
    #[must_use]
    pub const fn fade_probability(&self) -> f64 {
        self.fade_probability
    }
}

/// The set of venues available to the router.
///
/// Venues are held sorted by descending liquidity, ties broken by
/// name, so selection is deterministic for a given configuration.
#[derive(Debug, Clone)]
pub struct VenueUniverse {
    venues: Vec<Venue>,
}

impl VenueUniverse {
    /// Builds the universe, sorting venues by liquidity.
    #[must_use]
    pub fn new(mut venues: Vec<Venue>) -> Self {
        venues.sort_by(|a, b| {
            b.base_liquidity
                .cmp(&a.base_liquidity)
                .then_with(|| a.venue_id.as_str().cmp(b.venue_id.as_str()))
        });
        Self { venues }
    }

    /// The most liquid `count` venues.
    #[must_use]
    pub fn select(&self, count: usize) -> Vec<&Venue> {
        self.venues.iter().take(count).collect()
    }

    /// The most liquid `count` venues not in the excluded set.
    ///
    /// Falls back to the unfiltered selection when every venue is
    /// excluded, so a retry pass always has somewhere to route.
    #[must_use]
    pub fn select_excluding(&self, count: usize, excluded: &HashSet<VenueId>) -> Vec<&Venue> {
        let filtered: Vec<&Venue> = self
            .venues
            .iter()
            .filter(|venue| !excluded.contains(&venue.venue_id))
            .take(count)
            .collect();
        if filtered.is_empty() {
            self.select(count)
        } else {
            filtered
        }
    }

    /// Looks up a venue by id.
    #[must_use]
    pub fn get(&self, venue_id: &VenueId) -> Option<&Venue> {
        self.venues.iter().find(|venue| &venue.venue_id == venue_id)
    }

    /// All venues, most liquid first.
    #[must_use]
    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    /// Number of venues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.venues.len()
    }

    /// True if no venues are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }
}
