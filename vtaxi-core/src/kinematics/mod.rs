//! Speed and acceleration profile of an aircraft following a computed path.
//!
//! A simplified model: no routing decision depends on it.

mod aircraft;
mod profile;

pub use aircraft::{AircraftPhysics, AircraftSize, AircraftType, KNOT};
pub use profile::{MovementPoint, movement_profile};
