//! Taxi network components - nodes, segments and their semantic tags

use std::fmt;

use geo::{LineString, Point};
use serde::{Deserialize, Serialize};

use crate::Meters;

/// Semantic type of a network segment, taken from the OSM `aeroway` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    Taxiway,
    Runway,
    ParkingPosition,
}

impl SegmentType {
    /// Maps an `aeroway` tag to a routable segment type.
    /// Aprons and every other tag are not part of the network.
    pub fn from_aeroway(tag: &str) -> Option<Self> {
        match tag {
            "taxiway" => Some(Self::Taxiway),
            "runway" => Some(Self::Runway),
            "parking_position" => Some(Self::ParkingPosition),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Taxiway => "taxiway",
            Self::Runway => "runway",
            Self::ParkingPosition => "parking_position",
        }
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a node, assigned once by the classifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    #[default]
    Intersection,
    RunwayExit,
    ParkingExit,
    Gate,
}

impl NodeRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intersection => "intersection",
            Self::RunwayExit => "runway_exit",
            Self::ParkingExit => "parking_exit",
            Self::Gate => "gate",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gate metadata attached to a dead-end parking node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateInfo {
    pub gate_id: String,
    pub heading: f64,
    pub segment_id: String,
}

/// Taxi network node
#[derive(Debug, Clone, PartialEq)]
pub struct TaxiNode {
    /// `N00000`-style identifier, assigned in discovery order
    pub id: String,
    /// Node coordinates, rounded to the processing precision
    pub geometry: Point<f64>,
    /// Incident segment ids in registration order
    pub connected_segments: Vec<String>,
    pub role: NodeRole,
    pub gate: Option<GateInfo>,
}

impl TaxiNode {
    pub fn new(id: String, geometry: Point<f64>) -> Self {
        Self {
            id,
            geometry,
            connected_segments: Vec::new(),
            role: NodeRole::Intersection,
            gate: None,
        }
    }

    pub fn degree(&self) -> usize {
        self.connected_segments.len()
    }
}

/// Taxi network segment between two adjacent nodes
#[derive(Debug, Clone, PartialEq)]
pub struct TaxiSegment {
    /// `S00000`-style identifier, assigned in creation order
    pub id: String,
    pub start_node: String,
    pub end_node: String,
    pub geometry: LineString<f64>,
    pub segment_type: SegmentType,
    /// Taxiway, runway or gate designator. Shared by many segments.
    pub name: String,
    /// Geodesic length in meters
    pub length: Meters,
    /// Degrees in `[0, 360)` from the first to the last vertex
    pub heading: f64,
}

impl TaxiSegment {
    pub fn touches(&self, node_id: &str) -> bool {
        self.start_node == node_id || self.end_node == node_id
    }

    /// Endpoint on the other side of `node_id`, if the segment touches it
    pub fn opposite(&self, node_id: &str) -> Option<&str> {
        if self.start_node == node_id {
            Some(&self.end_node)
        } else if self.end_node == node_id {
            Some(&self.start_node)
        } else {
            None
        }
    }

    pub fn endpoints(&self) -> [&str; 2] {
        [&self.start_node, &self.end_node]
    }
}

impl fmt::Display for TaxiSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} -> {}",
            self.id, self.name, self.start_node, self.end_node
        )
    }
}
