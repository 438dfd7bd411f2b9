use std::collections::BTreeMap;
use std::path::Path;

use hashbrown::HashMap;
use log::{info, warn};

use super::classifier::classify_nodes;
use super::config::{AirportProcessingConfig, ProcessingSettings, RunwayConfigurationTemplate};
use super::indexer::{IndexedNetwork, index_lines};
use super::raw::{RawLine, SupplementaryData, read_raw_lines};
use crate::Error;
use crate::export;
use crate::model::{
    Airport, AirportConfig, GateRecord, GatesSection, RunwayConfiguration, RunwayPoint,
    SegmentType, TaxiGraph, Terminal, terminal_id,
};

/// Output of the processing step: the classified network and its configuration
#[derive(Debug, Clone)]
pub struct ProcessedAirport {
    pub network: IndexedNetwork,
    pub config: AirportConfig,
}

impl ProcessedAirport {
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_network(&self, path: &Path) -> Result<(), Error> {
        export::write_network(path, &self.network.nodes, &self.network.segments)?;
        info!("Network written to {}", path.display());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_config(&self, path: &Path) -> Result<(), Error> {
        export::write_config(path, &self.config)?;
        info!("Airport configuration written to {}", path.display());
        Ok(())
    }

    /// Builds the routable airport without going through the files
    ///
    /// # Errors
    ///
    /// Returns an error if the network is inconsistent.
    pub fn to_airport(&self) -> Result<Airport, Error> {
        let graph = TaxiGraph::from_parts(self.network.nodes.clone(), self.network.segments.clone())?;
        Ok(Airport::new(graph, self.config.clone()))
    }
}

/// Runs the full processing step on the configured input files
///
/// # Errors
///
/// Returns an error if an input file is missing or malformed.
pub fn process_airport(config: &AirportProcessingConfig) -> Result<ProcessedAirport, Error> {
    validate_config(config)?;

    info!("Reading raw network: {}", config.geojson_path.display());
    let lines = read_raw_lines(&config.geojson_path)?;
    info!(
        "Reading supplementary data: {}",
        config.supplementary_path.display()
    );
    let supplementary = SupplementaryData::from_path(&config.supplementary_path)?;

    Ok(process_lines(&lines, supplementary, &config.settings))
}

/// Indexes, classifies and assembles the airport from already-read inputs
pub fn process_lines(
    lines: &[RawLine],
    supplementary: SupplementaryData,
    settings: &ProcessingSettings,
) -> ProcessedAirport {
    info!("Indexing {} network lines", lines.len());
    let mut network = index_lines(lines, settings);
    info!(
        "Created {} nodes and {} segments",
        network.nodes.len(),
        network.segments.len()
    );

    let gates = classify_nodes(
        &mut network,
        &settings.runway_points,
        &supplementary.parking_exit_taxiways(),
    );
    info!("Found {} gates", gates.len());

    let runway_configurations = settings
        .runway_configurations
        .iter()
        .map(|(name, template)| (name.clone(), resolve_configuration(&network, template)))
        .collect();

    let config = AirportConfig {
        airport_code: settings.airport_code.clone(),
        name: settings.name.clone(),
        runways: supplementary.runways,
        gates: group_gates(gates),
        parking_positions: supplementary.parking_positions,
        runway_configurations,
    };

    ProcessedAirport { network, config }
}

fn validate_config(config: &AirportProcessingConfig) -> Result<(), Error> {
    for path in [&config.geojson_path, &config.supplementary_path] {
        if !path.exists() {
            return Err(Error::NotFound(path.clone()));
        }
    }
    Ok(())
}

fn group_gates(gates: HashMap<String, GateRecord>) -> GatesSection {
    let total_count = gates.len();
    let mut terminals: BTreeMap<String, Terminal> = BTreeMap::new();
    for gate in gates.into_values() {
        terminals
            .entry(terminal_id(&gate.gate_id))
            .or_default()
            .gates
            .push(gate);
    }
    for terminal in terminals.values_mut() {
        terminal.gates.sort_by(|a, b| a.gate_id.cmp(&b.gate_id));
    }
    GatesSection {
        terminals,
        total_count,
    }
}

fn resolve_configuration(
    network: &IndexedNetwork,
    template: &RunwayConfigurationTemplate,
) -> RunwayConfiguration {
    let resolve = |names: &[String]| {
        names
            .iter()
            .map(|name| RunwayPoint {
                name: name.clone(),
                node_id: runway_point_node(network, name),
            })
            .collect()
    };

    RunwayConfiguration {
        departure: template.departure.clone(),
        arrival: template.arrival.clone(),
        entrances: resolve(&template.entrances),
        exits: resolve(&template.exits),
        alternates: template.alternates.clone(),
    }
}

/// Node where the named entrance/exit meets the runway.
///
/// Falls back to the end node of the first segment carrying the name.
fn runway_point_node(network: &IndexedNetwork, name: &str) -> Option<String> {
    let nodes = network.node_positions();
    let segments = network.segment_positions();

    let touches_runway = |node_id: &str| {
        nodes.get(node_id).is_some_and(|&idx| {
            network.nodes[idx].connected_segments.iter().any(|segment_id| {
                segments.get(segment_id.as_str()).is_some_and(|&s| {
                    network.segments[s].segment_type == SegmentType::Runway
                })
            })
        })
    };

    let mut named = network.segments.iter().filter(|s| s.name == name).peekable();
    let fallback = named.peek().map(|segment| segment.end_node.clone());

    let on_runway = named
        .flat_map(|segment| segment.endpoints())
        .find(|node_id| touches_runway(node_id))
        .map(ToString::to_string);

    match on_runway.or(fallback) {
        Some(node_id) => Some(node_id),
        None => {
            warn!("Runway point {name} has no segment in the network");
            None
        }
    }
}
