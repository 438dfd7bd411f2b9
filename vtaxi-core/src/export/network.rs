use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoJsonValue};
use serde::Serialize;
use serde_json::Value;

use crate::Error;
use crate::loading::persisted::{NodeProperties, SegmentProperties};
use crate::model::{AirportConfig, TaxiNode, TaxiSegment};

/// Network as a `FeatureCollection`: segment `LineString`s first, then node `Point`s
///
/// # Errors
///
/// Returns an error if feature properties cannot be serialized.
pub fn network_to_geojson(
    nodes: &[TaxiNode],
    segments: &[TaxiSegment],
) -> Result<FeatureCollection, Error> {
    let mut features = Vec::with_capacity(nodes.len() + segments.len());

    for segment in segments {
        features.push(feature(
            Geometry::new(GeoJsonValue::from(&segment.geometry)),
            &SegmentProperties::from(segment),
        )?);
    }
    for node in nodes {
        features.push(feature(
            Geometry::new(GeoJsonValue::from(&node.geometry)),
            &NodeProperties::from(node),
        )?);
    }

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

/// Writes the network `GeoJSON` file
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_network(
    path: &Path,
    nodes: &[TaxiNode],
    segments: &[TaxiSegment],
) -> Result<(), Error> {
    let collection = network_to_geojson(nodes, segments)?;
    write_json(path, &collection)
}

/// Writes the airport configuration file
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_config(path: &Path, config: &AirportConfig) -> Result<(), Error> {
    write_json(path, config)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

fn feature<P: Serialize>(geometry: Geometry, properties: &P) -> Result<Feature, Error> {
    let properties: JsonObject = match serde_json::to_value(properties)? {
        Value::Object(map) => map,
        other => {
            return Err(Error::GeoJsonError(format!(
                "Feature properties must be an object, got {other}"
            )));
        }
    };

    Ok(Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}
