use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::Error;
use crate::model::TaxiGraph;
use crate::routing::TaxiPath;

impl TaxiPath {
    /// Converts the route to a `GeoJSON` `FeatureCollection`: one `LineString`
    /// per distinct segment in travel order, then one `Point` per waypoint node.
    ///
    /// # Errors
    ///
    /// Returns an error if a segment or node of the path is not in `graph`.
    pub fn to_geojson(&self, graph: &TaxiGraph) -> Result<FeatureCollection, Error> {
        let mut features = Vec::with_capacity(self.segments.len() + self.waypoints.len());

        for (sequence, segment_id) in self.unique_segments().into_iter().enumerate() {
            let segment = graph.segment_by_id(segment_id).ok_or_else(|| {
                Error::InvalidData(format!("Path segment {segment_id} is not in the network"))
            })?;
            let geometry = Geometry::new(GeoJsonValue::from(&segment.geometry));

            let value = json!({
                "type": "Feature",
                "geometry": geometry,
                "properties": {
                    "segment_id": segment.id,
                    "name": segment.name,
                    "segment_type": segment.segment_type.as_str(),
                    "sequence": sequence,
                    "length": segment.length,
                }
            });
            features.push(
                Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))?,
            );
        }

        for (sequence, node_id) in self.waypoints.iter().enumerate() {
            let node = graph.node_by_id(node_id).ok_or_else(|| {
                Error::InvalidData(format!("Path waypoint {node_id} is not in the network"))
            })?;
            let geometry = Geometry::new(GeoJsonValue::from(&node.geometry));

            let value = json!({
                "type": "Feature",
                "geometry": geometry,
                "properties": {
                    "node_id": node.id,
                    "node_type": node.role.as_str(),
                    "sequence": sequence,
                }
            });
            features.push(
                Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))?,
            );
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self, graph: &TaxiGraph) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson(graph)?)
            .map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}
