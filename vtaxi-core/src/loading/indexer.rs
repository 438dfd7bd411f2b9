//! Geometry indexer: raw lines to nodes and segments
//!
//! Every line endpoint and every single-point crossing between two lines
//! becomes a candidate node. Candidates are deduplicated on their rounded
//! coordinates, then each line is cut into one segment per pair of
//! consecutive nodes lying on it.

use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{
    BoundingRect, Closest, ClosestPoint, Coord, Distance, Euclidean, Geodesic, Intersects,
    LineLocatePoint, LineString, Point,
};
use hashbrown::HashMap;
use itertools::Itertools;
use log::{debug, trace};
use rayon::prelude::*;
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

use super::config::ProcessingSettings;
use super::raw::RawLine;
use crate::model::{TaxiNode, TaxiSegment};

type NodePoint = GeomWithData<[f64; 2], usize>;
type CoordKey = (i64, i64);

/// Nodes and segments produced by the indexer, in id order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedNetwork {
    pub nodes: Vec<TaxiNode>,
    pub segments: Vec<TaxiSegment>,
}

impl IndexedNetwork {
    pub(crate) fn node_positions(&self) -> HashMap<&str, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id.as_str(), idx))
            .collect()
    }

    pub(crate) fn segment_positions(&self) -> HashMap<&str, usize> {
        self.segments
            .iter()
            .enumerate()
            .map(|(idx, segment)| (segment.id.as_str(), idx))
            .collect()
    }
}

pub(crate) fn node_id(idx: usize) -> String {
    format!("N{idx:05}")
}

pub(crate) fn segment_id(idx: usize) -> String {
    format!("S{idx:05}")
}

/// Builds the raw (unclassified) network from line features
pub(crate) fn index_lines(lines: &[RawLine], settings: &ProcessingSettings) -> IndexedNetwork {
    let scale = settings.precision_scale();

    let mut candidates: Vec<Coord<f64>> = Vec::with_capacity(lines.len() * 2);
    for line in lines {
        if let (Some(first), Some(last)) = (line.geometry.0.first(), line.geometry.0.last()) {
            candidates.push(*first);
            candidates.push(*last);
        }
    }
    let crossings = line_crossings(lines, scale);
    debug!(
        "Found {} endpoints and {} line crossings",
        candidates.len(),
        crossings.len()
    );
    candidates.extend(crossings);

    let mut nodes = deduplicate(&candidates, scale);
    let rtree = RTree::bulk_load(
        nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| NodePoint::new([node.geometry.x(), node.geometry.y()], idx))
            .collect(),
    );

    let mut segments: Vec<TaxiSegment> = Vec::new();
    for line in lines {
        let on_line = nodes_on_line(line, &nodes, &rtree, settings.on_line_tolerance);
        for (&start, &end) in on_line.iter().tuple_windows() {
            let geometry = slice_between(
                &line.geometry,
                nodes[start].geometry.0,
                nodes[end].geometry.0,
            );
            let idx = segments.len();
            let id = segment_id(idx);

            nodes[start].connected_segments.push(id.clone());
            nodes[end].connected_segments.push(id.clone());

            segments.push(TaxiSegment {
                id,
                start_node: nodes[start].id.clone(),
                end_node: nodes[end].id.clone(),
                length: geodesic_length(&geometry),
                heading: heading(&geometry),
                geometry,
                segment_type: line.segment_type,
                name: line.name.clone(),
            });
        }
    }

    IndexedNetwork { nodes, segments }
}

/// Single-point crossings for every unordered pair of lines, in pair order
fn line_crossings(lines: &[RawLine], scale: f64) -> Vec<Coord<f64>> {
    (0..lines.len())
        .into_par_iter()
        .flat_map_iter(move |i| {
            let first = &lines[i].geometry;
            lines[i + 1..]
                .iter()
                .filter_map(move |other| single_crossing(first, &other.geometry, scale))
        })
        .collect()
}

/// The intersection of two lines, if it is exactly one point.
///
/// Overlapping lines and lines meeting in several points yield `None`.
pub(crate) fn single_crossing(a: &LineString<f64>, b: &LineString<f64>, scale: f64) -> Option<Coord<f64>> {
    let (Some(rect_a), Some(rect_b)) = (a.bounding_rect(), b.bounding_rect()) else {
        return None;
    };
    if !rect_a.intersects(&rect_b) {
        return None;
    }

    let mut found: Vec<Coord<f64>> = Vec::new();
    for line_a in a.lines() {
        for line_b in b.lines() {
            let point = match line_intersection(line_a, line_b) {
                Some(LineIntersection::SinglePoint { intersection, .. }) => intersection,
                Some(LineIntersection::Collinear { intersection })
                    if intersection.start == intersection.end =>
                {
                    intersection.start
                }
                Some(LineIntersection::Collinear { .. }) => return None,
                None => continue,
            };
            if !found
                .iter()
                .any(|known| coord_key(*known, scale) == coord_key(point, scale))
            {
                found.push(point);
            }
        }
    }

    match found.as_slice() {
        [single] => Some(*single),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn coord_key(coord: Coord<f64>, scale: f64) -> CoordKey {
    ((coord.x * scale).round() as i64, (coord.y * scale).round() as i64)
}

/// One node per distinct rounded coordinate, ids in discovery order
fn deduplicate(candidates: &[Coord<f64>], scale: f64) -> Vec<TaxiNode> {
    let mut seen: HashMap<CoordKey, usize> = HashMap::with_capacity(candidates.len());
    let mut nodes = Vec::new();

    for &candidate in candidates {
        let key = coord_key(candidate, scale);
        if seen.contains_key(&key) {
            continue;
        }
        let idx = nodes.len();
        seen.insert(key, idx);
        #[allow(clippy::cast_precision_loss)]
        let rounded = Point::new(key.0 as f64 / scale, key.1 as f64 / scale);
        nodes.push(TaxiNode::new(node_id(idx), rounded));
    }

    nodes
}

/// Nodes lying on `line`, ordered by straight-line distance from its start
fn nodes_on_line(
    line: &RawLine,
    nodes: &[TaxiNode],
    rtree: &RTree<NodePoint>,
    tolerance: f64,
) -> Vec<usize> {
    let (Some(rect), Some(first)) = (line.geometry.bounding_rect(), line.geometry.0.first()) else {
        return Vec::new();
    };
    let start = Point::from(*first);
    let envelope = AABB::from_corners(
        [rect.min().x - tolerance, rect.min().y - tolerance],
        [rect.max().x + tolerance, rect.max().y + tolerance],
    );

    let mut on_line: Vec<(f64, usize)> = rtree
        .locate_in_envelope(&envelope)
        .filter_map(|item| {
            let point = nodes[item.data].geometry;
            let distance = distance_to_line(&point, &line.geometry)?;
            (distance < tolerance).then(|| (Euclidean.distance(&start, &point), item.data))
        })
        .collect();
    on_line.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    if on_line.len() < 2 {
        trace!(
            "Line {:?} has {} node(s) on it, no segment created",
            line.name,
            on_line.len()
        );
    }
    on_line.into_iter().map(|(_, idx)| idx).collect()
}

fn distance_to_line(point: &Point<f64>, line: &LineString<f64>) -> Option<f64> {
    match line.closest_point(point) {
        Closest::Intersection(_) => Some(0.0),
        Closest::SinglePoint(closest) => Some(Euclidean.distance(&closest, point)),
        Closest::Indeterminate => None,
    }
}

/// Sub-polyline of `line` running from `from` to `to`.
///
/// Both node coordinates become the segment's end vertices and every original
/// vertex strictly between them is kept, so crossings in the middle of a
/// straight edge still produce a segment with its true extent.
fn slice_between(line: &LineString<f64>, from: Coord<f64>, to: Coord<f64>) -> LineString<f64> {
    let (Some(from_fraction), Some(to_fraction)) = (
        line.line_locate_point(&Point::from(from)),
        line.line_locate_point(&Point::from(to)),
    ) else {
        return LineString::new(vec![from, to]);
    };

    let (low, high) = if from_fraction <= to_fraction {
        (from_fraction, to_fraction)
    } else {
        (to_fraction, from_fraction)
    };

    let fractions = vertex_fractions(line);
    let interior = line
        .coords()
        .zip(fractions)
        .filter(|(_, fraction)| *fraction > low && *fraction < high)
        .map(|(coord, _)| *coord);

    let mut coords = vec![from];
    if from_fraction <= to_fraction {
        coords.extend(interior);
    } else {
        coords.extend(interior.collect::<Vec<_>>().into_iter().rev());
    }
    coords.push(to);
    LineString::new(coords)
}

/// Position of each vertex as a fraction of the line's planar length
fn vertex_fractions(line: &LineString<f64>) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(line.0.len());
    let mut total = 0.0;
    cumulative.push(0.0);
    for piece in line.lines() {
        total += piece.dx().hypot(piece.dy());
        cumulative.push(total);
    }
    if total > 0.0 {
        cumulative.iter_mut().for_each(|value| *value /= total);
    }
    cumulative
}

/// Sum of geodesic distances between consecutive vertices, in meters
pub(crate) fn geodesic_length(geometry: &LineString<f64>) -> f64 {
    geometry
        .lines()
        .map(|piece| Geodesic.distance(Point::from(piece.start), Point::from(piece.end)))
        .sum()
}

/// Angle of the first-to-last vertex vector in degrees, in `[0, 360)`
pub(crate) fn heading(geometry: &LineString<f64>) -> f64 {
    match (geometry.0.first(), geometry.0.last()) {
        (Some(first), Some(last)) if geometry.0.len() >= 2 => {
            let dx = last.x - first.x;
            let dy = last.y - first.y;
            dy.atan2(dx).to_degrees().rem_euclid(360.0)
        }
        _ => 0.0,
    }
}
