//! Execution venues: the universe the router selects from and the
//! probabilistic model of how venues respond.

mod model;
mod response;
mod universe;

pub use model::VenueResponseModel;
pub use response::VenueResponse;
pub use universe::{Venue, VenueUniverse};
