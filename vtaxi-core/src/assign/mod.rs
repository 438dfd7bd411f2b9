//! Random assignment of runway configuration, gate and runway entrance/exit
//! for a single movement.
//!
//! Callers may pin any choice; everything left open is drawn from the
//! configured options with the supplied random number generator.

use std::collections::BTreeMap;
use std::path::Path;

use log::{info, warn};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::Error;
use crate::model::{AirportConfig, GateRecord, RunwayConfiguration, terminal_id};
use crate::routing::MovementType;

/// Gate preferences and exclusions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateRequest {
    /// Exact gate wanted, overrides the terminal preference
    pub gate: Option<String>,
    pub terminal: Option<String>,
    pub exclude_gates: Vec<String>,
    pub exclude_terminals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRequest {
    pub movement: MovementType,
    /// Runway configuration name, random when `None`
    pub configuration: Option<String>,
    /// Runway entrance (departure) or exit (arrival), random when `None`
    pub runway_point: Option<String>,
    pub gate: GateRequest,
}

impl AssignmentRequest {
    pub fn new(movement: MovementType) -> Self {
        Self {
            movement,
            configuration: None,
            runway_point: None,
            gate: GateRequest::default(),
        }
    }
}

/// Positions chosen for a movement. `gate` and `runway_point` are either both
/// set or both empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub configuration_name: String,
    pub configuration: RunwayConfiguration,
    pub movement: String,
    /// Runway designator used by the movement
    pub runway: String,
    pub gate: Option<GateRecord>,
    pub runway_point: Option<String>,
}

impl Assignment {
    pub fn is_complete(&self) -> bool {
        self.gate.is_some() && self.runway_point.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunwayPointOptions {
    pub entrances: Vec<String>,
    pub exits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableOptions {
    pub configurations: Vec<String>,
    pub terminals: Vec<String>,
    pub runway_points: BTreeMap<String, RunwayPointOptions>,
}

pub struct PositionAssigner {
    config: AirportConfig,
}

impl PositionAssigner {
    pub fn new(config: AirportConfig) -> Self {
        info!(
            "Loaded runway configurations: {}",
            config.configuration_names().join(", ")
        );
        info!("Loaded {} gates", config.gates.total_count);
        Self { config }
    }

    /// # Errors
    ///
    /// Returns an error if the configuration file is missing or invalid.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        Ok(Self::new(AirportConfig::from_path(path)?))
    }

    pub fn config(&self) -> &AirportConfig {
        &self.config
    }

    /// The named runway configuration, or a random one
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unknown or no configuration exists.
    pub fn configuration<R: Rng + ?Sized>(
        &self,
        name: Option<&str>,
        rng: &mut R,
    ) -> Result<(String, &RunwayConfiguration), Error> {
        let names = self.config.configuration_names();
        let name = match name {
            Some(name) => name.to_string(),
            None => names.choose(rng).cloned().ok_or_else(|| {
                Error::InvalidConfiguration("No runway configurations defined".to_string())
            })?,
        };

        let configuration = self.config.runway_configuration(&name).ok_or_else(|| {
            Error::InvalidConfiguration(format!(
                "Invalid configuration direction: {name}. Valid options: {}",
                names.join(", ")
            ))
        })?;
        Ok((name, configuration))
    }

    /// Looks a gate up in the terminal its id belongs to
    pub fn gate_by_id(&self, gate_id: &str) -> Option<&GateRecord> {
        self.config
            .gates
            .terminals
            .get(&terminal_id(gate_id))?
            .gates
            .iter()
            .find(|gate| gate.gate_id == gate_id)
    }

    /// Picks a gate honoring the request's preferences and exclusions
    pub fn find_gate<R: Rng + ?Sized>(
        &self,
        request: &GateRequest,
        rng: &mut R,
    ) -> Option<&GateRecord> {
        let terminal_allowed = |terminal: &str| !request.exclude_terminals.iter().any(|t| t == terminal);
        let gate_allowed = |gate: &&GateRecord| !request.exclude_gates.contains(&gate.gate_id);

        if let Some(gate_id) = &request.gate {
            let Some(gate) = self.gate_by_id(gate_id) else {
                warn!("Specified gate {gate_id} not found");
                return None;
            };
            let terminal = terminal_id(gate_id);
            if !terminal_allowed(&terminal) {
                warn!("Requested gate {gate_id} is in excluded terminal {terminal}");
                return None;
            }
            if !gate_allowed(&gate) {
                warn!("Requested gate {gate_id} is in excluded gates list");
                return None;
            }
            info!("Using specified gate: {gate_id}");
            return Some(gate);
        }

        let terminals = &self.config.gates.terminals;
        let mut available: Vec<&GateRecord> = request
            .terminal
            .as_deref()
            .filter(|terminal| terminal_allowed(terminal))
            .and_then(|terminal| terminals.get(terminal))
            .map(|terminal| terminal.gates.iter().filter(gate_allowed).collect())
            .unwrap_or_default();

        if available.is_empty() {
            available = terminals
                .iter()
                .filter(|(terminal, _)| terminal_allowed(terminal))
                .flat_map(|(_, terminal)| terminal.gates.iter())
                .filter(gate_allowed)
                .collect();
        }

        let Some(&gate) = available.choose(rng) else {
            warn!(
                "No suitable gates found (excluded terminals: [{}]; excluded gates: [{}])",
                request.exclude_terminals.join(", "),
                request.exclude_gates.join(", ")
            );
            return None;
        };
        info!("Selected gate: {}", gate.gate_id);
        Some(gate)
    }

    /// Picks a runway entrance (departures) or exit (arrivals)
    pub fn find_runway_point<R: Rng + ?Sized>(
        &self,
        configuration: &RunwayConfiguration,
        departure: bool,
        specific: Option<&str>,
        rng: &mut R,
    ) -> Option<String> {
        let (points, kind) = if departure {
            (configuration.entrance_names(), "entrance")
        } else {
            (configuration.exit_names(), "exit")
        };

        if let Some(point) = specific {
            if points.iter().any(|name| name == point) {
                info!("Using specified runway {kind}: {point}");
                return Some(point.to_string());
            }
            warn!(
                "Specified {kind} {point} not valid for this configuration. Valid options: {}",
                points.join(", ")
            );
            return None;
        }

        let Some(selected) = points.choose(rng) else {
            warn!("No runway {kind} points defined in configuration");
            return None;
        };
        info!("Selected runway {kind}: {selected}");
        Some(selected.clone())
    }

    /// Assigns every position of a movement
    ///
    /// # Errors
    ///
    /// Returns an error if the requested configuration does not exist.
    pub fn assign<R: Rng + ?Sized>(
        &self,
        request: &AssignmentRequest,
        rng: &mut R,
    ) -> Result<Assignment, Error> {
        let (name, configuration) = self.configuration(request.configuration.as_deref(), rng)?;
        let departure = request.movement.is_departure();
        let runway = configuration.runway_for(departure).to_string();
        info!(
            "Selected {name} configuration, finding positions for {} on runway {runway}",
            request.movement
        );

        let gate = self.find_gate(&request.gate, rng).cloned();
        let runway_point =
            self.find_runway_point(configuration, departure, request.runway_point.as_deref(), rng);

        let (gate, runway_point) = match (gate, runway_point) {
            (Some(gate), Some(point)) => (Some(gate), Some(point)),
            _ => (None, None),
        };

        Ok(Assignment {
            configuration_name: name,
            configuration: configuration.clone(),
            movement: request.movement.to_string(),
            runway,
            gate,
            runway_point,
        })
    }

    pub fn available_options(&self) -> AvailableOptions {
        let runway_points = self
            .config
            .runway_configurations
            .iter()
            .map(|(name, configuration)| {
                (
                    name.clone(),
                    RunwayPointOptions {
                        entrances: configuration.entrance_names(),
                        exits: configuration.exit_names(),
                    },
                )
            })
            .collect();

        AvailableOptions {
            configurations: self.config.configuration_names(),
            terminals: self.config.gates.terminals.keys().cloned().collect(),
            runway_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    use super::*;

    fn gate(gate_id: &str) -> serde_json::Value {
        json!({
            "gate_id": gate_id,
            "node_id": format!("N{gate_id}"),
            "coordinates": [2.35, 48.72],
            "heading": 0.0,
            "segment_id": format!("S{gate_id}")
        })
    }

    fn assigner() -> PositionAssigner {
        let config = AirportConfig::from_value(json!({
            "airport_code": "LFPO",
            "name": "Paris-Orly Airport",
            "runways": {},
            "gates": {
                "terminals": {
                    "A": {"gates": [gate("A1"), gate("A2")]},
                    "K": {"gates": [gate("K24"), gate("K25"), gate("K26")]}
                },
                "total_count": 5
            },
            "parking_positions": {},
            "runway_configurations": {
                "EAST": {
                    "departure": "07",
                    "arrival": "06",
                    "entrances": [{"name": "W37", "node_id": "N1"}, {"name": "W36", "node_id": "N2"}],
                    "exits": [{"name": "W44", "node_id": "N3"}],
                    "alternates": {"departure": "24", "arrival": "25"}
                },
                "WEST": {
                    "departure": "24",
                    "arrival": "25",
                    "entrances": [{"name": "W41", "node_id": "N4"}],
                    "exits": [],
                    "alternates": {"departure": "06", "arrival": "07"}
                }
            }
        }))
        .unwrap();
        PositionAssigner::new(config)
    }

    #[test]
    fn test_specific_gate_is_honored_unless_excluded() {
        let assigner = assigner();
        let mut rng = StdRng::seed_from_u64(7);

        let mut request = GateRequest {
            gate: Some("K25".to_string()),
            ..GateRequest::default()
        };
        assert_eq!(assigner.find_gate(&request, &mut rng).unwrap().gate_id, "K25");

        request.exclude_terminals = vec!["K".to_string()];
        assert!(assigner.find_gate(&request, &mut rng).is_none());

        request.exclude_terminals.clear();
        request.exclude_gates = vec!["K25".to_string()];
        assert!(assigner.find_gate(&request, &mut rng).is_none());

        request.gate = Some("Z1".to_string());
        assert!(assigner.find_gate(&request, &mut rng).is_none());
    }

    #[test]
    fn test_random_gate_respects_preferences_and_exclusions() {
        let assigner = assigner();
        let mut rng = StdRng::seed_from_u64(42);

        let request = GateRequest {
            terminal: Some("K".to_string()),
            exclude_gates: vec!["K24".to_string(), "K26".to_string()],
            ..GateRequest::default()
        };
        for _ in 0..20 {
            assert_eq!(assigner.find_gate(&request, &mut rng).unwrap().gate_id, "K25");
        }

        // the preferred terminal is excluded, so any other terminal qualifies
        let request = GateRequest {
            terminal: Some("K".to_string()),
            exclude_terminals: vec!["K".to_string()],
            ..GateRequest::default()
        };
        for _ in 0..20 {
            let gate = assigner.find_gate(&request, &mut rng).unwrap();
            assert!(gate.gate_id.starts_with('A'));
        }

        let request = GateRequest {
            exclude_terminals: vec!["A".to_string(), "K".to_string()],
            ..GateRequest::default()
        };
        assert!(assigner.find_gate(&request, &mut rng).is_none());
    }

    #[test]
    fn test_runway_point_follows_movement() {
        let assigner = assigner();
        let mut rng = StdRng::seed_from_u64(1);
        let (_, east) = assigner.configuration(Some("EAST"), &mut rng).unwrap();

        for _ in 0..10 {
            let entrance = assigner.find_runway_point(east, true, None, &mut rng).unwrap();
            assert!(entrance == "W37" || entrance == "W36");
        }
        assert_eq!(
            assigner.find_runway_point(east, false, None, &mut rng),
            Some("W44".to_string())
        );
        assert!(assigner.find_runway_point(east, false, Some("W37"), &mut rng).is_none());
    }

    #[test]
    fn test_unknown_configuration_is_an_error() {
        let assigner = assigner();
        let mut rng = StdRng::seed_from_u64(1);
        let result = assigner.configuration(Some("NORTH"), &mut rng);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_assignment_is_all_or_nothing() {
        let assigner = assigner();
        let mut rng = StdRng::seed_from_u64(3);

        let mut request = AssignmentRequest::new(MovementType::Departure);
        request.configuration = Some("EAST".to_string());
        request.gate.gate = Some("A1".to_string());
        let assignment = assigner.assign(&request, &mut rng).unwrap();
        assert!(assignment.is_complete());
        assert_eq!(assignment.runway, "07");
        assert_eq!(assignment.gate.unwrap().gate_id, "A1");

        // WEST has no exits, so an arrival gets neither position
        let mut request = AssignmentRequest::new(MovementType::Arrival);
        request.configuration = Some("WEST".to_string());
        let assignment = assigner.assign(&request, &mut rng).unwrap();
        assert!(!assignment.is_complete());
        assert!(assignment.gate.is_none());
        assert_eq!(assignment.runway, "25");
    }

    #[test]
    fn test_seeded_assignment_is_reproducible() {
        let assigner = assigner();
        let request = AssignmentRequest::new(MovementType::Departure);

        let first = assigner
            .assign(&request, &mut StdRng::seed_from_u64(11))
            .unwrap();
        let second = assigner
            .assign(&request, &mut StdRng::seed_from_u64(11))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_available_options() {
        let options = assigner().available_options();
        assert_eq!(options.configurations, vec!["EAST", "WEST"]);
        assert_eq!(options.terminals, vec!["A", "K"]);
        assert_eq!(options.runway_points["EAST"].entrances, vec!["W37", "W36"]);
        assert!(options.runway_points["WEST"].exits.is_empty());
    }
}
