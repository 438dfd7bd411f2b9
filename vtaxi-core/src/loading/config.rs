use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::model::Alternates;

/// Configuration for the offline processing step
#[derive(Debug, Clone)]
pub struct AirportProcessingConfig {
    /// Raw OSM `GeoJSON` export
    pub geojson_path: PathBuf,
    /// Supplementary JSON with `runways` and `parking_positions`
    pub supplementary_path: PathBuf,
    pub settings: ProcessingSettings,
}

/// Airport-specific processing constants.
///
/// Defaults describe Paris-Orly (LFPO). Any field may be overridden from a
/// TOML file; omitted fields keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    pub airport_code: String,
    pub name: String,
    /// Decimal digits kept when deduplicating coordinates into nodes
    pub coordinate_precision: u32,
    /// Maximum distance (coordinate units) for a node to count as lying on a line
    pub on_line_tolerance: f64,
    /// Known runway entrance/exit identifiers
    pub runway_points: BTreeSet<String>,
    pub runway_configurations: BTreeMap<String, RunwayConfigurationTemplate>,
}

/// Hand-authored runway configuration, before entrance/exit nodes are resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunwayConfigurationTemplate {
    pub departure: String,
    pub arrival: String,
    pub entrances: Vec<String>,
    pub exits: Vec<String>,
    pub alternates: Alternates,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        let names = |items: &[&str]| items.iter().map(ToString::to_string).collect::<Vec<_>>();

        let mut runway_configurations = BTreeMap::new();
        runway_configurations.insert(
            "WEST".to_string(),
            RunwayConfigurationTemplate {
                departure: "24".to_string(),
                arrival: "25".to_string(),
                entrances: names(&["W41", "W42"]),
                exits: names(&["W34", "W35", "W4", "W36", "W37"]),
                alternates: Alternates {
                    departure: "06".to_string(),
                    arrival: "07".to_string(),
                },
            },
        );
        runway_configurations.insert(
            "EAST".to_string(),
            RunwayConfigurationTemplate {
                departure: "07".to_string(),
                arrival: "06".to_string(),
                entrances: names(&["W37", "W36"]),
                exits: names(&["W44", "W43", "W42", "W41"]),
                alternates: Alternates {
                    departure: "24".to_string(),
                    arrival: "25".to_string(),
                },
            },
        );

        Self {
            airport_code: "LFPO".to_string(),
            name: "Paris-Orly Airport".to_string(),
            coordinate_precision: 7,
            on_line_tolerance: 1e-8,
            runway_points: names(&[
                "W34", "W35", "W36", "W37", "W4", "W41", "W42", "W43", "W44",
            ])
            .into_iter()
            .collect(),
            runway_configurations,
        }
    }
}

impl ProcessingSettings {
    /// Loads settings from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// # Errors
    ///
    /// Returns an error if the text is not valid settings TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.coordinate_precision > 12 {
            return Err(Error::InvalidConfiguration(format!(
                "coordinate_precision {} is out of range (0..=12)",
                self.coordinate_precision
            )));
        }
        if !(self.on_line_tolerance > 0.0) {
            return Err(Error::InvalidConfiguration(
                "on_line_tolerance must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Scale factor used to turn coordinates into integer dedup keys
    pub(crate) fn precision_scale(&self) -> f64 {
        10_f64.powi(self.coordinate_precision as i32)
    }
}
