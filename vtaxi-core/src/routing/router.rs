use fixedbitset::FixedBitSet;
use hashbrown::HashSet;
use log::{debug, warn};
use petgraph::graph::NodeIndex;

use super::dijkstra::constrained_dijkstra;
use super::{MovementType, RouteError, TaxiPath};
use crate::model::{AirportConfig, RunwayConfiguration, RunwayPoint, SegmentType, TaxiGraph};
use crate::{Error, Meters, SegmentIdx};

/// Routes aircraft through sequences of named waypoints under one runway
/// configuration.
///
/// Each leg between consecutive waypoints may only use segments carrying one
/// of the two waypoint names, and no segment is used twice along a route. The
/// router holds no per-request state and can be shared between threads.
#[derive(Debug, Clone)]
pub struct WaypointRouter<'a> {
    graph: &'a TaxiGraph,
    config: &'a AirportConfig,
    configuration_name: String,
    configuration: &'a RunwayConfiguration,
}

/// Search state owned by a single `find_path` call
struct Route {
    path: TaxiPath,
    used: FixedBitSet,
    anchor: NodeIndex,
}

impl Route {
    fn push(&mut self, graph: &TaxiGraph, idx: SegmentIdx, mark_used: bool) {
        let segment = graph.segment(idx);
        self.path.add_segment(segment.id.clone(), segment.length);
        if mark_used {
            self.used.insert(idx);
        }
    }

    fn move_to(&mut self, graph: &TaxiGraph, node: NodeIndex) {
        self.anchor = node;
        self.path.add_waypoint(graph.node(node).id.clone());
    }
}

impl<'a> WaypointRouter<'a> {
    /// # Errors
    ///
    /// Returns an error if `configuration` is not defined in the airport data.
    pub fn new(
        graph: &'a TaxiGraph,
        config: &'a AirportConfig,
        configuration: &str,
    ) -> Result<Self, Error> {
        let runway_configuration = config.runway_configuration(configuration).ok_or_else(|| {
            Error::InvalidConfiguration(format!(
                "Unknown runway configuration {configuration}. Valid configurations are: {}",
                config.configuration_names().join(", ")
            ))
        })?;

        Ok(Self {
            graph,
            config,
            configuration_name: configuration.to_string(),
            configuration: runway_configuration,
        })
    }

    pub fn configuration_name(&self) -> &str {
        &self.configuration_name
    }

    pub fn configuration(&self) -> &RunwayConfiguration {
        self.configuration
    }

    /// Finds the shortest path through `waypoints`, in order.
    ///
    /// Arrivals run from a runway exit to a gate, departures from a gate to a
    /// runway entrance. Every intermediate waypoint is a segment name.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] if the endpoints are not valid for the movement
    /// and configuration, if a waypoint names no segment, or if a leg has no
    /// path on its allowed segments.
    pub fn find_path<S: AsRef<str>>(
        &self,
        waypoints: &[S],
        movement: MovementType,
    ) -> Result<TaxiPath, RouteError> {
        let points: Vec<&str> = waypoints.iter().map(AsRef::as_ref).collect();
        self.validate(&points, movement)?;
        debug!(
            "Routing {movement} through {} under {}",
            points.join(" -> "),
            self.configuration_name
        );

        let mut route = self.start(&points, movement)?;
        let last = points.len() - 1;

        for (i, pair) in points.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            let pinned = (movement.is_departure() && i + 1 == last)
                .then(|| self.configuration.entrance(to))
                .flatten();
            let targets = self.resolve(to, pinned);
            if targets.is_empty() {
                return Err(RouteError::UnresolvedWaypoint {
                    waypoint: to.to_string(),
                });
            }

            let allowed = [from, to];
            let search = constrained_dijkstra(self.graph, route.anchor, &targets, &allowed, &route.used);

            let mut best: Option<(Meters, NodeIndex, Vec<SegmentIdx>)> = None;
            for &target in &targets {
                let Some(distance) = search.distance(target) else {
                    continue;
                };
                if best.as_ref().is_some_and(|(best_distance, ..)| distance >= *best_distance) {
                    continue;
                }
                let Some(segments) = search.segments_to(target) else {
                    continue;
                };
                if segments
                    .iter()
                    .all(|&idx| allowed.contains(&self.graph.segment(idx).name.as_str()))
                {
                    best = Some((distance, target, segments));
                }
            }

            let Some((distance, target, segments)) = best else {
                return Err(RouteError::NoPathForLeg {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            };
            debug!(
                "Leg {from} -> {to}: {} segment(s), {distance:.1}m",
                segments.len()
            );
            for idx in segments {
                route.push(self.graph, idx, true);
            }
            route.move_to(self.graph, target);
        }

        self.close(&points, movement, &mut route);
        Ok(route.path)
    }

    fn validate(&self, points: &[&str], movement: MovementType) -> Result<(), RouteError> {
        let [first, .., last] = points else {
            return Err(RouteError::TooFewWaypoints(points.len()));
        };

        match movement {
            MovementType::Arrival => {
                if self.configuration.exit(first).is_none() {
                    return Err(RouteError::InvalidRunwayExit {
                        waypoint: (*first).to_string(),
                        configuration: self.configuration_name.clone(),
                        valid: self.configuration.exit_names(),
                    });
                }
                self.check_gate(last)
            }
            MovementType::Departure => {
                self.check_gate(first)?;
                if self.configuration.entrance(last).is_none() {
                    return Err(RouteError::InvalidRunwayEntrance {
                        waypoint: (*last).to_string(),
                        configuration: self.configuration_name.clone(),
                        valid: self.configuration.entrance_names(),
                    });
                }
                Ok(())
            }
        }
    }

    fn check_gate(&self, gate_id: &str) -> Result<(), RouteError> {
        match self.config.gate(gate_id) {
            Some(_) => Ok(()),
            None => Err(RouteError::UnknownGate {
                waypoint: gate_id.to_string(),
            }),
        }
    }

    /// Candidate nodes for a waypoint: the pinned node when there is one,
    /// otherwise every endpoint of every segment carrying the name.
    fn resolve(&self, waypoint: &str, pinned: Option<&RunwayPoint>) -> Vec<NodeIndex> {
        if let Some(point) = pinned
            && let Some(node_id) = &point.node_id
        {
            match self.graph.node_index(node_id) {
                Some(index) => return vec![index],
                None => warn!("{waypoint} is pinned to unknown node {node_id}, using all its nodes"),
            }
        }

        let mut seen = HashSet::new();
        self.graph
            .segments_named(waypoint)
            .iter()
            .flat_map(|&idx| self.graph.segment(idx).endpoints())
            .filter_map(|node_id| self.graph.node_index(node_id))
            .filter(|index| seen.insert(*index))
            .collect()
    }

    fn pinned_node(&self, point: Option<&RunwayPoint>) -> Option<NodeIndex> {
        point
            .and_then(|point| point.node_id.as_deref())
            .and_then(|node_id| self.graph.node_index(node_id))
    }

    fn gate_node(&self, gate_id: &str) -> Option<NodeIndex> {
        self.config
            .gate(gate_id)
            .and_then(|gate| self.graph.node_index(&gate.node_id))
    }

    /// First segment of the route, leaving the gate or the runway
    fn start(&self, points: &[&str], movement: MovementType) -> Result<Route, RouteError> {
        let first = points[0];
        let candidates = self.graph.segments_named(first);
        let Some(&fallback) = candidates.first() else {
            return Err(RouteError::UnresolvedWaypoint {
                waypoint: first.to_string(),
            });
        };

        let incident = |node: NodeIndex| {
            let node_id = &self.graph.node(node).id;
            candidates
                .iter()
                .copied()
                .find(|&idx| self.graph.segment(idx).touches(node_id))
        };

        let (segment_idx, from, mark_used) = match movement {
            MovementType::Departure => {
                match self.gate_node(first).and_then(|gate| Some((incident(gate)?, gate))) {
                    // The gate segment stays usable for the rest of the route
                    Some((idx, gate)) => (idx, Some(gate), false),
                    None => (fallback, None, true),
                }
            }
            MovementType::Arrival => {
                let exit = self.pinned_node(self.configuration.exit(first));
                match exit.and_then(|exit| Some((incident(exit)?, exit))) {
                    Some((idx, exit)) => (idx, Some(exit), true),
                    None => {
                        let runway = candidates
                            .iter()
                            .copied()
                            .find(|&idx| self.graph.segment(idx).segment_type == SegmentType::Runway);
                        (runway.unwrap_or(fallback), None, true)
                    }
                }
            }
        };

        let segment = self.graph.segment(segment_idx);
        let anchor_id = from
            .and_then(|node| segment.opposite(&self.graph.node(node).id))
            .unwrap_or(segment.end_node.as_str());
        let anchor = self.graph.node_index(anchor_id).ok_or_else(|| {
            RouteError::UnresolvedWaypoint {
                waypoint: first.to_string(),
            }
        })?;

        let mut route = Route {
            path: TaxiPath::new(),
            used: FixedBitSet::with_capacity(self.graph.segment_count()),
            anchor,
        };
        route.push(self.graph, segment_idx, mark_used);
        route.move_to(self.graph, anchor);
        Ok(route)
    }

    /// Joins the anchor to the runway entrance or gate node with the final
    /// waypoint's segment, when the last leg stopped short of it
    fn close(&self, points: &[&str], movement: MovementType, route: &mut Route) {
        let last = points[points.len() - 1];
        let end = match movement {
            MovementType::Departure => self.pinned_node(self.configuration.entrance(last)),
            MovementType::Arrival => self.gate_node(last),
        };
        let Some(end) = end else {
            return;
        };
        if end == route.anchor {
            return;
        }

        let anchor_id = &self.graph.node(route.anchor).id;
        let end_id = &self.graph.node(end).id;
        let closing = self.graph.segments_named(last).iter().copied().find(|&idx| {
            let segment = self.graph.segment(idx);
            !route.used.contains(idx) && segment.touches(anchor_id) && segment.touches(end_id)
        });

        match closing {
            Some(idx) => {
                route.push(self.graph, idx, true);
                route.move_to(self.graph, end);
            }
            None => debug!("No {last} segment joins {anchor_id} to {end_id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_airport;

    fn segment_names(graph: &TaxiGraph, path: &TaxiPath) -> Vec<String> {
        path.segments
            .iter()
            .map(|id| graph.segment_by_id(id).unwrap().name.clone())
            .collect()
    }

    fn length_sum(graph: &TaxiGraph, path: &TaxiPath) -> f64 {
        path.segments
            .iter()
            .map(|id| graph.segment_by_id(id).unwrap().length)
            .sum()
    }

    #[test]
    fn test_departure_from_gate_to_runway_entrance() {
        let airport = fixture_airport();
        let router = airport.router("WEST").unwrap();

        let path = router
            .find_path(&["K24", "W2", "W37"], MovementType::Departure)
            .unwrap();

        assert_eq!(path.segments, vec!["S00005", "S00003", "S00002"]);
        assert_eq!(segment_names(&airport.graph, &path), vec!["K24", "W2", "W37"]);
        assert_eq!(path.unique_segments().len(), path.segments.len());
        assert!((path.total_distance - length_sum(&airport.graph, &path)).abs() < 1e-9);
        // ends on the configured W37 entrance node
        assert_eq!(path.waypoints.last().map(String::as_str), Some("N00002"));
    }

    #[test]
    fn test_arrival_from_runway_exit_to_gate() {
        let airport = fixture_airport();
        let router = airport.router("WEST").unwrap();

        let path = router
            .find_path(&["W37", "W2", "K24"], MovementType::Arrival)
            .unwrap();

        assert_eq!(path.segments, vec!["S00002", "S00003", "S00005"]);
        assert_eq!(path.waypoints.last().map(String::as_str), Some("N00006"));
        assert!((path.total_distance - length_sum(&airport.graph, &path)).abs() < 1e-9);
    }

    #[test]
    fn test_arrival_leaves_exit_node_on_reversed_exit_taxiway() {
        use geo::line_string;

        use crate::loading::process_lines;
        use crate::model::SegmentType;
        use crate::test_support::{fixture_lines, fixture_settings, fixture_supplementary};

        // W37 drawn from the apron down to the runway
        let mut lines = fixture_lines();
        lines[1] = crate::loading::RawLine::new(
            line_string![(x: 2.36, y: 48.723), (x: 2.36, y: 48.72)],
            SegmentType::Taxiway,
            "W37",
        );
        let airport = process_lines(&lines, fixture_supplementary(), &fixture_settings())
            .to_airport()
            .unwrap();
        let router = airport.router("WEST").unwrap();
        let exit = router
            .configuration()
            .exit("W37")
            .and_then(|point| point.node_id.clone())
            .unwrap();

        let path = router
            .find_path(&["W37", "W2", "K24"], MovementType::Arrival)
            .unwrap();

        let first = airport.graph.segment_by_id(&path.segments[0]).unwrap();
        assert_eq!(first.name, "W37");
        assert_eq!(first.end_node, exit);
        // anchored at the far end, not at the segment's end node
        assert_eq!(path.waypoints[0], first.start_node);
        assert_eq!(segment_names(&airport.graph, &path), vec!["W37", "W2", "K24"]);
        assert_eq!(path.unique_segments().len(), path.segments.len());
    }

    #[test]
    fn test_routing_is_deterministic() {
        let airport = fixture_airport();
        let router = airport.router("WEST").unwrap();

        let first = router
            .find_path(&["K24", "W2", "W37"], MovementType::Departure)
            .unwrap();
        for _ in 0..5 {
            let again = router
                .find_path(&["K24", "W2", "W37"], MovementType::Departure)
                .unwrap();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_leg_without_allowed_path_fails() {
        let airport = fixture_airport();
        let router = airport.router("WEST").unwrap();

        // K24 and W37 only meet through W2 or X1, neither of which is allowed
        let result = router.find_path(&["K24", "W37"], MovementType::Departure);
        assert_eq!(
            result,
            Err(RouteError::NoPathForLeg {
                from: "K24".to_string(),
                to: "W37".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_intermediate_waypoint_fails() {
        let airport = fixture_airport();
        let router = airport.router("WEST").unwrap();

        let result = router.find_path(&["K24", "L4", "W37"], MovementType::Departure);
        assert_eq!(
            result,
            Err(RouteError::UnresolvedWaypoint {
                waypoint: "L4".to_string()
            })
        );
    }

    #[test]
    fn test_validation_rejects_bad_endpoints() {
        let airport = fixture_airport();
        let router = airport.router("WEST").unwrap();

        assert_eq!(
            router.find_path(&["K24"], MovementType::Departure),
            Err(RouteError::TooFewWaypoints(1))
        );
        assert!(matches!(
            router.find_path(&["W2", "K24"], MovementType::Arrival),
            Err(RouteError::InvalidRunwayExit { .. })
        ));
        assert!(matches!(
            router.find_path(&["K24", "W2"], MovementType::Departure),
            Err(RouteError::InvalidRunwayEntrance { .. })
        ));
        assert_eq!(
            router.find_path(&["K99", "W2", "W37"], MovementType::Departure),
            Err(RouteError::UnknownGate {
                waypoint: "K99".to_string()
            })
        );
        assert_eq!(
            router.find_path(&["W37", "W2", "K99"], MovementType::Arrival),
            Err(RouteError::UnknownGate {
                waypoint: "K99".to_string()
            })
        );
    }

    #[test]
    fn test_configuration_without_points_rejects_everything() {
        let airport = fixture_airport();
        let router = airport.router("EAST").unwrap();

        let result = router.find_path(&["K24", "W2", "W37"], MovementType::Departure);
        assert!(matches!(
            result,
            Err(RouteError::InvalidRunwayEntrance { ref valid, .. }) if valid.is_empty()
        ));
    }

    #[test]
    fn test_unknown_configuration_is_rejected() {
        let airport = fixture_airport();
        assert!(matches!(
            airport.router("NORTH"),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_router_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WaypointRouter<'_>>();
    }
}
