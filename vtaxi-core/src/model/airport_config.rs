//! Airport configuration document shared by the processing step, the router
//! and the position assigner.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;

/// Processed airport configuration (`<CODE>.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportConfig {
    pub airport_code: String,
    pub name: String,
    /// Passed through from the supplementary input
    #[serde(default)]
    pub runways: Value,
    pub gates: GatesSection,
    /// Passed through from the supplementary input
    #[serde(default)]
    pub parking_positions: Value,
    pub runway_configurations: BTreeMap<String, RunwayConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatesSection {
    pub terminals: BTreeMap<String, Terminal>,
    pub total_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Terminal {
    pub gates: Vec<GateRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRecord {
    pub gate_id: String,
    pub node_id: String,
    /// `[lon, lat]`
    pub coordinates: [f64; 2],
    pub heading: f64,
    pub segment_id: String,
}

/// Runway entrance or exit, pinned to the node where it meets the runway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunwayPoint {
    pub name: String,
    pub node_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternates {
    pub departure: String,
    pub arrival: String,
}

/// Named runway configuration (`EAST` / `WEST`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunwayConfiguration {
    pub departure: String,
    pub arrival: String,
    pub entrances: Vec<RunwayPoint>,
    pub exits: Vec<RunwayPoint>,
    pub alternates: Alternates,
}

impl RunwayConfiguration {
    pub fn entrance(&self, name: &str) -> Option<&RunwayPoint> {
        self.entrances.iter().find(|point| point.name == name)
    }

    pub fn exit(&self, name: &str) -> Option<&RunwayPoint> {
        self.exits.iter().find(|point| point.name == name)
    }

    pub fn entrance_names(&self) -> Vec<String> {
        self.entrances.iter().map(|point| point.name.clone()).collect()
    }

    pub fn exit_names(&self) -> Vec<String> {
        self.exits.iter().map(|point| point.name.clone()).collect()
    }

    /// Runway designator used by the given movement
    pub fn runway_for(&self, departure: bool) -> &str {
        if departure {
            &self.departure
        } else {
            &self.arrival
        }
    }
}

/// Terminal identifier of a gate: every non-digit character (`K` for `K24`)
pub fn terminal_id(gate_id: &str) -> String {
    gate_id.chars().filter(|c| !c.is_ascii_digit()).collect()
}

impl AirportConfig {
    /// Reads a processed configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, is not valid JSON, or lacks the
    /// `runway_configurations` or `gates` sections.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    /// # Errors
    ///
    /// Returns an error if a required section is missing or malformed.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        for section in ["runway_configurations", "gates"] {
            if value.get(section).is_none() {
                return Err(Error::InvalidConfiguration(format!(
                    "No {section} found in airport data"
                )));
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn runway_configuration(&self, name: &str) -> Option<&RunwayConfiguration> {
        self.runway_configurations.get(name)
    }

    pub fn configuration_names(&self) -> Vec<String> {
        self.runway_configurations.keys().cloned().collect()
    }

    /// Finds a gate by id, looking in its terminal first
    pub fn gate(&self, gate_id: &str) -> Option<&GateRecord> {
        let terminals = &self.gates.terminals;
        terminals
            .get(&terminal_id(gate_id))
            .and_then(|terminal| terminal.gates.iter().find(|gate| gate.gate_id == gate_id))
            .or_else(|| {
                terminals
                    .values()
                    .flat_map(|terminal| terminal.gates.iter())
                    .find(|gate| gate.gate_id == gate_id)
            })
    }

    pub fn all_gates(&self) -> impl Iterator<Item = &GateRecord> {
        self.gates
            .terminals
            .values()
            .flat_map(|terminal| terminal.gates.iter())
    }
}
