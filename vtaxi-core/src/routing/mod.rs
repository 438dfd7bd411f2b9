//! Constrained multi-waypoint routing over the taxi network

mod dijkstra;
mod path;
mod router;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::Error;

pub use path::TaxiPath;
pub use router::WaypointRouter;

/// Direction of a ground movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementType {
    /// Runway exit to gate
    Arrival,
    /// Gate to runway entrance
    Departure,
}

impl MovementType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arrival => "arrival",
            Self::Departure => "departure",
        }
    }

    pub fn is_departure(self) -> bool {
        self == Self::Departure
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrival" => Ok(Self::Arrival),
            "departure" => Ok(Self::Departure),
            other => Err(Error::InvalidConfiguration(format!(
                "Unknown movement type {other}, expected arrival or departure"
            ))),
        }
    }
}

/// Why a routing request produced no path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Path must contain at least start and end points, got {0} waypoint(s)")]
    TooFewWaypoints(usize),
    #[error(
        "{waypoint} is not a valid runway exit for {configuration} configuration. Valid exits are: {}",
        .valid.join(", ")
    )]
    InvalidRunwayExit {
        waypoint: String,
        configuration: String,
        valid: Vec<String>,
    },
    #[error(
        "{waypoint} is not a valid runway entrance for {configuration} configuration. Valid entrances are: {}",
        .valid.join(", ")
    )]
    InvalidRunwayEntrance {
        waypoint: String,
        configuration: String,
        valid: Vec<String>,
    },
    #[error("{waypoint} is not a valid gate")]
    UnknownGate { waypoint: String },
    #[error("No segments found for {waypoint}")]
    UnresolvedWaypoint { waypoint: String },
    #[error("No valid path found from {from} to {to}")]
    NoPathForLeg { from: String, to: String },
}
