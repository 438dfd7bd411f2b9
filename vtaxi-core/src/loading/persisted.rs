//! Reading the processed network and configuration back into memory

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, Value as GeoJsonValue};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{
    Airport, AirportConfig, GateInfo, NodeRole, SegmentType, TaxiGraph, TaxiNode, TaxiSegment,
};
use crate::{Error, Meters};

/// Properties of a segment `LineString` feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SegmentProperties {
    pub segment_id: String,
    pub name: String,
    pub segment_type: SegmentType,
    pub start_node: String,
    pub end_node: String,
    pub length: Meters,
    pub heading: f64,
}

/// Properties of a node `Point` feature. Gate fields appear only on gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct NodeProperties {
    pub node_id: String,
    pub node_type: NodeRole,
    pub connected_segments: Vec<String>,
    #[serde(flatten)]
    pub gate: Option<GateInfo>,
}

impl From<&TaxiSegment> for SegmentProperties {
    fn from(segment: &TaxiSegment) -> Self {
        Self {
            segment_id: segment.id.clone(),
            name: segment.name.clone(),
            segment_type: segment.segment_type,
            start_node: segment.start_node.clone(),
            end_node: segment.end_node.clone(),
            length: segment.length,
            heading: segment.heading,
        }
    }
}

impl From<&TaxiNode> for NodeProperties {
    fn from(node: &TaxiNode) -> Self {
        Self {
            node_id: node.id.clone(),
            node_type: node.role,
            connected_segments: node.connected_segments.clone(),
            gate: node.gate.clone(),
        }
    }
}

/// Loads a processed airport from its network `GeoJSON` and configuration file
///
/// # Errors
///
/// Returns an error if either file is missing or malformed, if the
/// configuration lacks its runway configurations or gates, or if a segment
/// references an unknown node.
pub fn load_airport(network_path: &Path, config_path: &Path) -> Result<Airport, Error> {
    let config = AirportConfig::from_path(config_path)?;
    let graph = read_network(network_path)?;
    info!(
        "Loaded {} network: {} nodes, {} segments, {} gates",
        config.airport_code,
        graph.node_count(),
        graph.segment_count(),
        config.gates.total_count
    );
    Ok(Airport::new(graph, config))
}

/// Reads the network `GeoJSON` into a graph
///
/// # Errors
///
/// Returns an error if the file is missing, is not a `FeatureCollection`, or
/// holds features that do not describe nodes or segments.
pub fn read_network(path: &Path) -> Result<TaxiGraph, Error> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let reader = BufReader::new(File::open(path)?);
    let collection: FeatureCollection = serde_json::from_reader(reader)?;
    network_from_features(collection.features)
}

pub(crate) fn network_from_features(features: Vec<Feature>) -> Result<TaxiGraph, Error> {
    let mut nodes = Vec::new();
    let mut segments = Vec::new();

    for feature in features {
        let Some(geometry) = feature.geometry else {
            continue;
        };
        let properties = Value::Object(feature.properties.unwrap_or_default());

        match geometry.value {
            value @ GeoJsonValue::LineString(_) => {
                let props: SegmentProperties = serde_json::from_value(properties)?;
                let geometry = LineString::<f64>::try_from(value)
                    .map_err(|e| Error::GeoJsonError(e.to_string()))?;
                segments.push(TaxiSegment {
                    id: props.segment_id,
                    start_node: props.start_node,
                    end_node: props.end_node,
                    geometry,
                    segment_type: props.segment_type,
                    name: props.name,
                    length: props.length,
                    heading: props.heading,
                });
            }
            value @ GeoJsonValue::Point(_) => {
                let props: NodeProperties = serde_json::from_value(properties)?;
                let geometry =
                    Point::<f64>::try_from(value).map_err(|e| Error::GeoJsonError(e.to_string()))?;
                nodes.push(TaxiNode {
                    id: props.node_id,
                    geometry,
                    connected_segments: props.connected_segments,
                    role: props.node_type,
                    gate: props.gate,
                });
            }
            _ => {}
        }
    }

    TaxiGraph::from_parts(nodes, segments)
}
