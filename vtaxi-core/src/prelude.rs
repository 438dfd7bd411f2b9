// Re-export key components
pub use crate::assign::{
    Assignment, AssignmentRequest, AvailableOptions, GateRequest, PositionAssigner,
};
pub use crate::kinematics::{AircraftPhysics, AircraftType, MovementPoint, movement_profile};
pub use crate::loading::{
    AirportProcessingConfig, ProcessedAirport, ProcessingSettings, RawLine, load_airport,
    process_airport, process_lines,
};
pub use crate::model::{
    Airport, AirportConfig, GateInfo, GateRecord, NodeRole, RunwayConfiguration, RunwayPoint,
    SegmentType, TaxiGraph, TaxiNode, TaxiSegment,
};
pub use crate::routing::{MovementType, RouteError, TaxiPath, WaypointRouter};

pub use crate::Error;
pub use crate::Meters;
pub use crate::SegmentIdx;
