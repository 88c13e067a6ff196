//! Battery- and load-aware drive simulation.
//!
//! [`Vehicle`] turns an encoded tour (customers only) into the route an
//! electric vehicle actually drives, inserting depot returns and charger
//! stops, and reports its true distance.

mod vehicle;

pub use vehicle::{DriveReport, Path, PathOutcome, Vehicle, IMPOSSIBLE_ROUTE_PENALTY};
