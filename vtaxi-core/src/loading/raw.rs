//! Raw OSM export and supplementary airport data

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use geo::LineString;
use geojson::{Feature, FeatureCollection, Value as GeoJsonValue};
use hashbrown::HashSet;
use log::debug;
use serde_json::Value;

use crate::Error;
use crate::model::SegmentType;

/// A routable line feature from the raw export
#[derive(Debug, Clone, PartialEq)]
pub struct RawLine {
    pub geometry: LineString<f64>,
    pub segment_type: SegmentType,
    /// OSM `ref` tag, empty when absent
    pub name: String,
}

impl RawLine {
    pub fn new(geometry: LineString<f64>, segment_type: SegmentType, name: impl Into<String>) -> Self {
        Self {
            geometry,
            segment_type,
            name: name.into(),
        }
    }
}

/// Reads every taxiway, runway and parking position `LineString` from an OSM
/// `GeoJSON` export. Aprons, other tags and other geometry types are skipped.
///
/// # Errors
///
/// Returns an error if the file is missing or is not a `FeatureCollection`.
pub fn read_raw_lines(path: &Path) -> Result<Vec<RawLine>, Error> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let reader = BufReader::new(File::open(path)?);
    let collection: FeatureCollection = serde_json::from_reader(reader)?;
    Ok(raw_lines_from_features(collection.features))
}

pub(crate) fn raw_lines_from_features(features: Vec<Feature>) -> Vec<RawLine> {
    let total = features.len();
    let lines: Vec<RawLine> = features.into_iter().filter_map(raw_line).collect();
    debug!("Kept {} of {total} raw features as network lines", lines.len());
    lines
}

fn raw_line(feature: Feature) -> Option<RawLine> {
    let segment_type = feature
        .property("aeroway")
        .and_then(Value::as_str)
        .and_then(SegmentType::from_aeroway)?;
    let name = feature
        .property("ref")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let geometry = feature.geometry?;
    if !matches!(geometry.value, GeoJsonValue::LineString(_)) {
        return None;
    }
    let geometry = LineString::<f64>::try_from(geometry.value).ok()?;
    if geometry.0.len() < 2 {
        return None;
    }

    Some(RawLine::new(geometry, segment_type, name))
}

/// Supplementary airport data: runway and parking position tables passed
/// through to the processed configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplementaryData {
    pub runways: Value,
    pub parking_positions: Value,
}

impl SupplementaryData {
    /// # Errors
    ///
    /// Returns an error if the file is missing or is not valid JSON.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);
        let value: Value = serde_json::from_reader(reader)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        let section = |key: &str| {
            value
                .get(key)
                .cloned()
                .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
        };
        Self {
            runways: section("runways"),
            parking_positions: section("parking_positions"),
        }
    }

    /// Names of the taxiways parking positions exit onto
    pub fn parking_exit_taxiways(&self) -> HashSet<String> {
        self.parking_positions
            .as_object()
            .into_iter()
            .flat_map(|positions| positions.values())
            .filter_map(|position| position.get("exit_taxiway").and_then(Value::as_str))
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}
