use log::debug;
use serde::Serialize;

use super::aircraft::{AircraftPhysics, AircraftType, KNOT};
use crate::model::{SegmentType, TaxiGraph, TaxiSegment};
use crate::routing::TaxiPath;
use crate::{Error, Meters};

/// Lowest ground speed (m/s) used to advance along a segment. Keeps the
/// integration moving while the aircraft brakes towards the final stop.
const MIN_CREEP_SPEED: f64 = 0.5;

/// Aircraft state at one simulation step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementPoint {
    /// Distance from the start of the path, meters
    pub position: Meters,
    /// Seconds since departure from the first segment
    pub time: f64,
    /// Knots
    pub speed: f64,
    /// m/s²
    pub acceleration: f64,
    pub segment_id: String,
    /// Nearest end of the current segment
    pub node_id: String,
    pub heading: f64,
}

/// Speed limits of one path segment, knots
#[derive(Debug, Clone, Copy, PartialEq)]
struct SegmentConstraints {
    max_speed: f64,
    entry_speed: f64,
    exit_speed: f64,
    length: Meters,
}

fn segment_constraints(segments: &[&TaxiSegment], aircraft: &AircraftType) -> Vec<SegmentConstraints> {
    let mut constraints: Vec<SegmentConstraints> = Vec::with_capacity(segments.len());
    for (i, segment) in segments.iter().enumerate() {
        let mut max_speed = aircraft.max_taxi_speed;
        if segment.segment_type == SegmentType::Runway {
            max_speed *= 1.2;
        } else if segment.name.to_lowercase().contains("rapid") {
            max_speed *= 1.1;
        }

        let entry_speed = constraints
            .last()
            .map_or(max_speed, |previous| max_speed.min(previous.exit_speed));
        let exit_speed = if i + 1 == segments.len() { 0.0 } else { max_speed };

        constraints.push(SegmentConstraints {
            max_speed,
            entry_speed,
            exit_speed,
            length: segment.length,
        });
    }
    constraints
}

/// Simulates the aircraft along `path` with a fixed time step, starting and
/// ending at rest.
///
/// Target speed ramps linearly from each segment's entry limit to its exit
/// limit. The last point is the stop at the end of the path.
///
/// # Errors
///
/// Returns an error if `time_step` is not positive or a path segment is not in
/// the graph.
pub fn movement_profile(
    path: &TaxiPath,
    graph: &TaxiGraph,
    aircraft: &AircraftType,
    time_step: f64,
) -> Result<Vec<MovementPoint>, Error> {
    if !(time_step > 0.0) {
        return Err(Error::InvalidConfiguration(format!(
            "time step must be positive, got {time_step}"
        )));
    }

    let segments = path
        .segments
        .iter()
        .map(|id| {
            graph
                .segment_by_id(id)
                .ok_or_else(|| Error::InvalidData(format!("Path segment {id} is not in the network")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let constraints = segment_constraints(&segments, aircraft);

    let mut physics = AircraftPhysics::new(*aircraft);
    let mut points = Vec::new();
    let mut time = 0.0;
    let mut speed = 0.0;
    let mut position = 0.0;

    for (i, (segment, limits)) in segments.iter().zip(&constraints).enumerate() {
        let last = i + 1 == segments.len();
        let mut in_segment = 0.0;

        while in_segment < limits.length {
            let progress = in_segment / limits.length;
            let target = (limits.entry_speed + (limits.exit_speed - limits.entry_speed) * progress)
                .min(limits.max_speed);
            let remaining = limits.length - in_segment;
            let acceleration = physics.acceleration(target, last.then_some(remaining));

            let new_speed = physics.update_speed(time_step, acceleration);
            let average = (speed + new_speed) / 2.0 * KNOT;

            points.push(MovementPoint {
                position: position + in_segment,
                time,
                speed,
                acceleration,
                segment_id: segment.id.clone(),
                node_id: if progress > 0.5 {
                    segment.end_node.clone()
                } else {
                    segment.start_node.clone()
                },
                heading: segment.heading,
            });

            speed = new_speed;
            in_segment += average.max(MIN_CREEP_SPEED) * time_step;
            time += time_step;
        }
        position += limits.length;
    }

    if let Some(segment) = segments.last() {
        points.push(MovementPoint {
            position,
            time,
            speed: 0.0,
            acceleration: 0.0,
            segment_id: segment.id.clone(),
            node_id: segment.end_node.clone(),
            heading: segment.heading,
        });
    }

    debug!(
        "Movement profile for {}: {} points over {time:.0}s",
        aircraft,
        points.len()
    );
    Ok(points)
}
