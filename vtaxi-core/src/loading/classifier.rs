//! Node classification: runway exits, parking exits and gates

use std::collections::BTreeSet;

use hashbrown::{HashMap, HashSet};
use log::{debug, warn};

use super::indexer::IndexedNetwork;
use crate::model::{GateInfo, GateRecord, NodeRole, SegmentType};

/// Assigns node roles in three fixed passes and returns the gate index.
///
/// 1. Nodes touching a runway entrance/exit segment become `runway_exit`.
/// 2. Nodes touching a parking exit taxiway become `parking_exit`, unless they
///    already carry a role.
/// 3. Dead-end nodes whose only segment is a parking position become `gate`.
///    Runway exits are never reconsidered. Gates of unnamed parking positions
///    are not indexed.
pub(crate) fn classify_nodes(
    network: &mut IndexedNetwork,
    runway_points: &BTreeSet<String>,
    parking_exits: &HashSet<String>,
) -> HashMap<String, GateRecord> {
    let positions: HashMap<String, usize> = network
        .node_positions()
        .into_iter()
        .map(|(id, idx)| (id.to_string(), idx))
        .collect();

    for segment in &network.segments {
        if !runway_points.contains(&segment.name) {
            continue;
        }
        for node_id in segment.endpoints() {
            if let Some(&idx) = positions.get(node_id) {
                network.nodes[idx].role = NodeRole::RunwayExit;
            }
        }
    }

    for segment in &network.segments {
        if !parking_exits.contains(&segment.name) {
            continue;
        }
        for node_id in segment.endpoints() {
            if let Some(&idx) = positions.get(node_id)
                && network.nodes[idx].role == NodeRole::Intersection
            {
                network.nodes[idx].role = NodeRole::ParkingExit;
            }
        }
    }

    let segment_positions: HashMap<String, usize> = network
        .segment_positions()
        .into_iter()
        .map(|(id, idx)| (id.to_string(), idx))
        .collect();

    let mut gates: HashMap<String, GateRecord> = HashMap::new();
    for node in &mut network.nodes {
        if node.role == NodeRole::RunwayExit {
            continue;
        }
        let [segment_id] = node.connected_segments.as_slice() else {
            continue;
        };
        let Some(&segment_idx) = segment_positions.get(segment_id) else {
            continue;
        };
        let segment = &network.segments[segment_idx];
        if segment.segment_type != SegmentType::ParkingPosition {
            continue;
        }

        node.role = NodeRole::Gate;
        node.gate = Some(GateInfo {
            gate_id: segment.name.clone(),
            heading: segment.heading,
            segment_id: segment.id.clone(),
        });
        if segment.name.is_empty() {
            warn!(
                "Parking position {} has no ref, gate at {} left out of the gate index",
                segment.id, node.id
            );
            continue;
        }

        let record = GateRecord {
            gate_id: segment.name.clone(),
            node_id: node.id.clone(),
            coordinates: [node.geometry.x(), node.geometry.y()],
            heading: segment.heading,
            segment_id: segment.id.clone(),
        };
        if let Some(previous) = gates.insert(segment.name.clone(), record) {
            debug!(
                "Gate {} found again at {}, replacing {}",
                segment.name, node.id, previous.node_id
            );
        }
    }

    gates
}

#[cfg(test)]
mod tests {
    use geo::line_string;

    use super::*;
    use crate::loading::config::ProcessingSettings;
    use crate::loading::indexer::index_lines;
    use crate::loading::raw::RawLine;

    fn network() -> IndexedNetwork {
        let lines = vec![
            RawLine::new(
                line_string![(x: 2.35, y: 48.72), (x: 2.37, y: 48.72)],
                SegmentType::Taxiway,
                "W2",
            ),
            RawLine::new(
                line_string![(x: 2.36, y: 48.72), (x: 2.36, y: 48.71)],
                SegmentType::Taxiway,
                "W37",
            ),
            RawLine::new(
                line_string![(x: 2.35, y: 48.72), (x: 2.35, y: 48.721)],
                SegmentType::ParkingPosition,
                "K24",
            ),
            RawLine::new(
                line_string![(x: 2.36, y: 48.71), (x: 2.361, y: 48.709)],
                SegmentType::ParkingPosition,
                "K25",
            ),
        ];
        index_lines(&lines, &ProcessingSettings::default())
    }

    fn role_at(network: &IndexedNetwork, x: f64, y: f64) -> NodeRole {
        network
            .nodes
            .iter()
            .find(|node| {
                (node.geometry.x() - x).abs() < 1e-9 && (node.geometry.y() - y).abs() < 1e-9
            })
            .map(|node| node.role)
            .unwrap()
    }

    #[test]
    fn test_roles_are_assigned_in_order() {
        let mut network = network();
        let runway_points: BTreeSet<String> = ["W37".to_string()].into_iter().collect();
        let parking_exits: HashSet<String> = ["W2".to_string()].into_iter().collect();

        let gates = classify_nodes(&mut network, &runway_points, &parking_exits);

        // W37 junction wins over the parking exit rule
        assert_eq!(role_at(&network, 2.36, 48.72), NodeRole::RunwayExit);
        assert_eq!(role_at(&network, 2.36, 48.71), NodeRole::RunwayExit);
        assert_eq!(role_at(&network, 2.35, 48.72), NodeRole::ParkingExit);
        assert_eq!(role_at(&network, 2.37, 48.72), NodeRole::ParkingExit);
        assert_eq!(role_at(&network, 2.35, 48.721), NodeRole::Gate);

        assert_eq!(gates.len(), 2);
        let k24 = &gates["K24"];
        let gate_node = network.nodes.iter().find(|n| n.id == k24.node_id).unwrap();
        assert_eq!(gate_node.role, NodeRole::Gate);
        let info = gate_node.gate.as_ref().unwrap();
        assert_eq!(info.gate_id, "K24");
        assert_eq!(info.segment_id, k24.segment_id);
        assert!((info.heading - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_dead_end_parking_node_is_always_a_gate() {
        let mut network = network();
        let gates = classify_nodes(&mut network, &BTreeSet::new(), &HashSet::new());

        for node in &network.nodes {
            let [segment_id] = node.connected_segments.as_slice() else {
                continue;
            };
            let segment = network.segments.iter().find(|s| &s.id == segment_id).unwrap();
            if segment.segment_type == SegmentType::ParkingPosition {
                assert_eq!(node.role, NodeRole::Gate);
                assert!(node.gate.is_some());
            }
        }
        assert!(gates.contains_key("K25"));
    }

    #[test]
    fn test_unnamed_parking_dead_end_is_still_a_gate() {
        let lines = vec![
            RawLine::new(
                line_string![(x: 2.35, y: 48.72), (x: 2.37, y: 48.72)],
                SegmentType::Taxiway,
                "W2",
            ),
            RawLine::new(
                line_string![(x: 2.36, y: 48.72), (x: 2.36, y: 48.721)],
                SegmentType::ParkingPosition,
                "",
            ),
        ];
        let mut network = index_lines(&lines, &ProcessingSettings::default());

        let gates = classify_nodes(&mut network, &BTreeSet::new(), &HashSet::new());

        assert_eq!(role_at(&network, 2.36, 48.721), NodeRole::Gate);
        let node = network
            .nodes
            .iter()
            .find(|node| node.role == NodeRole::Gate)
            .unwrap();
        let info = node.gate.as_ref().unwrap();
        assert_eq!(info.gate_id, "");
        assert_eq!(&info.segment_id, &node.connected_segments[0]);
        assert!(gates.is_empty());
    }
}
