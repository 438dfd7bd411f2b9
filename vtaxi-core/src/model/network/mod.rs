//! Taxi network model

pub mod components;
pub mod graph;

pub use components::{GateInfo, NodeRole, SegmentType, TaxiNode, TaxiSegment};
pub use graph::TaxiGraph;
