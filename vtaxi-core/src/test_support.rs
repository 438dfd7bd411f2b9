//! Small hand-built airport shared by unit tests.
//!
//! ```text
//!        G (K24)
//!        |
//!        J ---- W2 ---- M ---- W2 ---- End
//!          \            |
//!           X1         W37
//!             \         |
//!  N0 ===== runway ==== E ===== runway ===== N1
//! ```

use geo::line_string;
use serde_json::json;

use crate::loading::{ProcessingSettings, RawLine, RunwayConfigurationTemplate, SupplementaryData};
use crate::loading::process_lines;
use crate::model::{Airport, Alternates, SegmentType};

pub(crate) fn fixture_lines() -> Vec<RawLine> {
    vec![
        RawLine::new(
            line_string![(x: 2.35, y: 48.72), (x: 2.37, y: 48.72)],
            SegmentType::Runway,
            "06/24",
        ),
        RawLine::new(
            line_string![(x: 2.36, y: 48.72), (x: 2.36, y: 48.723)],
            SegmentType::Taxiway,
            "W37",
        ),
        RawLine::new(
            line_string![(x: 2.355, y: 48.723), (x: 2.365, y: 48.723)],
            SegmentType::Taxiway,
            "W2",
        ),
        RawLine::new(
            line_string![(x: 2.355, y: 48.723), (x: 2.355, y: 48.724)],
            SegmentType::ParkingPosition,
            "K24",
        ),
        RawLine::new(
            line_string![(x: 2.355, y: 48.723), (x: 2.36, y: 48.72)],
            SegmentType::Taxiway,
            "X1",
        ),
    ]
}

pub(crate) fn fixture_settings() -> ProcessingSettings {
    let mut settings = ProcessingSettings {
        runway_points: ["W37".to_string()].into_iter().collect(),
        ..ProcessingSettings::default()
    };
    settings.runway_configurations.clear();
    settings.runway_configurations.insert(
        "WEST".to_string(),
        RunwayConfigurationTemplate {
            departure: "24".to_string(),
            arrival: "25".to_string(),
            entrances: vec!["W37".to_string()],
            exits: vec!["W37".to_string()],
            alternates: Alternates {
                departure: "06".to_string(),
                arrival: "07".to_string(),
            },
        },
    );
    settings.runway_configurations.insert(
        "EAST".to_string(),
        RunwayConfigurationTemplate {
            departure: "07".to_string(),
            arrival: "06".to_string(),
            entrances: Vec::new(),
            exits: Vec::new(),
            alternates: Alternates {
                departure: "24".to_string(),
                arrival: "25".to_string(),
            },
        },
    );
    settings
}

pub(crate) fn fixture_supplementary() -> SupplementaryData {
    SupplementaryData::from_value(&json!({
        "runways": {"06/24": {"length": 3650}},
        "parking_positions": {"K24": {"exit_taxiway": "W2"}}
    }))
}

pub(crate) fn fixture_airport() -> Airport {
    process_lines(&fixture_lines(), fixture_supplementary(), &fixture_settings())
        .to_airport()
        .unwrap()
}
