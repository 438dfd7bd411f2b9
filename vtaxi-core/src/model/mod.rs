//! Data model for the airport surface network
//!
//! Contains the taxi network graph and the airport configuration schema
//! shared by the processing step and the router.

pub mod airport_config;
pub mod airport_model;
pub mod network;

pub use airport_config::{
    AirportConfig, Alternates, GateRecord, GatesSection, RunwayConfiguration, RunwayPoint,
    Terminal, terminal_id,
};
pub use airport_model::Airport;
pub use network::{GateInfo, NodeRole, SegmentType, TaxiGraph, TaxiNode, TaxiSegment};
