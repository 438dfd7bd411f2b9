//! Airport taxi network processing and constrained waypoint routing.
//!
//! The crate turns raw OpenStreetMap surface geometry into a node/segment
//! network, persists it as `GeoJSON` plus an airport configuration file, and
//! routes aircraft through sequences of named taxiways.

pub mod assign;
pub mod error;
pub mod export;
pub mod kinematics;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;
pub use model::{Airport, AirportConfig, TaxiGraph};

/// Index of a segment inside [`TaxiGraph`]
pub type SegmentIdx = usize;
/// Distance along the network in meters
pub type Meters = f64;
