use itertools::Itertools;

use crate::Meters;

/// A computed taxi route
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaxiPath {
    /// Segment ids in travel order
    pub segments: Vec<String>,
    /// Sum of the lengths of every entry in `segments`
    pub total_distance: Meters,
    /// Node reached at the end of each stage
    pub waypoints: Vec<String>,
}

impl TaxiPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_segment(&mut self, segment_id: impl Into<String>, length: Meters) {
        self.segments.push(segment_id.into());
        self.total_distance += length;
    }

    pub fn add_waypoint(&mut self, node_id: impl Into<String>) {
        self.waypoints.push(node_id.into());
    }

    /// Segment ids in travel order, each listed once
    pub fn unique_segments(&self) -> Vec<&str> {
        self.segments.iter().map(String::as_str).unique().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
