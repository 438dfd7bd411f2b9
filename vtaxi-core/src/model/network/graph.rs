//! Routable taxi network graph

use hashbrown::HashMap;
use itertools::Itertools;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use super::components::{TaxiNode, TaxiSegment};
use crate::{Error, Meters, SegmentIdx};

/// Taxi network graph
///
/// Nodes live in an undirected `petgraph` graph, segments in an arena indexed
/// by [`SegmentIdx`]. Every named segment is one undirected edge, so it can be
/// traversed in both directions. The graph is immutable once built.
#[derive(Debug, Clone)]
pub struct TaxiGraph {
    pub(crate) graph: UnGraph<TaxiNode, SegmentIdx>,
    segments: Vec<TaxiSegment>,
    node_lookup: HashMap<String, NodeIndex>,
    segment_lookup: HashMap<String, SegmentIdx>,
    segments_by_name: HashMap<String, Vec<SegmentIdx>>,
}

impl TaxiGraph {
    /// Builds the graph from nodes and segments.
    ///
    /// Segments without a name stay addressable by id but are left out of the
    /// adjacency, since no name-restricted search could ever use them.
    ///
    /// # Errors
    ///
    /// Returns an error if a segment references a node that does not exist,
    /// or if node or segment ids are duplicated.
    pub fn from_parts(nodes: Vec<TaxiNode>, segments: Vec<TaxiSegment>) -> Result<Self, Error> {
        let mut graph = UnGraph::with_capacity(nodes.len(), segments.len());
        let mut node_lookup = HashMap::with_capacity(nodes.len());

        for node in nodes {
            let id = node.id.clone();
            let index = graph.add_node(node);
            if node_lookup.insert(id.clone(), index).is_some() {
                return Err(Error::InvalidData(format!("Duplicate node id {id}")));
            }
        }

        let mut segment_lookup = HashMap::with_capacity(segments.len());
        let mut segments_by_name: HashMap<String, Vec<SegmentIdx>> = HashMap::new();

        for (idx, segment) in segments.iter().enumerate() {
            if segment_lookup.insert(segment.id.clone(), idx).is_some() {
                return Err(Error::InvalidData(format!(
                    "Duplicate segment id {}",
                    segment.id
                )));
            }

            let resolve = |node_id: &str| {
                node_lookup.get(node_id).copied().ok_or_else(|| {
                    Error::InvalidData(format!(
                        "Segment {} references unknown node {node_id}",
                        segment.id
                    ))
                })
            };
            let start = resolve(&segment.start_node)?;
            let end = resolve(&segment.end_node)?;

            if segment.name.is_empty() {
                continue;
            }
            graph.add_edge(start, end, idx);
            segments_by_name
                .entry(segment.name.clone())
                .or_default()
                .push(idx);
        }

        Ok(Self {
            graph,
            segments,
            node_lookup,
            segment_lookup,
            segments_by_name,
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn node(&self, index: NodeIndex) -> &TaxiNode {
        &self.graph[index]
    }

    pub fn node_index(&self, node_id: &str) -> Option<NodeIndex> {
        self.node_lookup.get(node_id).copied()
    }

    pub fn node_by_id(&self, node_id: &str) -> Option<&TaxiNode> {
        self.node_index(node_id).map(|index| &self.graph[index])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &TaxiNode> {
        self.graph.node_weights()
    }

    pub fn segment(&self, idx: SegmentIdx) -> &TaxiSegment {
        &self.segments[idx]
    }

    pub fn segment_index(&self, segment_id: &str) -> Option<SegmentIdx> {
        self.segment_lookup.get(segment_id).copied()
    }

    pub fn segment_by_id(&self, segment_id: &str) -> Option<&TaxiSegment> {
        self.segment_index(segment_id).map(|idx| &self.segments[idx])
    }

    pub fn segments(&self) -> &[TaxiSegment] {
        &self.segments
    }

    /// Segments carrying `name`, in creation order
    pub fn segments_named(&self, name: &str) -> &[SegmentIdx] {
        self.segments_by_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Neighbors of `node` as `(neighbor, segment, length)` triples, in
    /// segment creation order
    pub fn neighbors(
        &self,
        node: NodeIndex,
    ) -> impl Iterator<Item = (NodeIndex, SegmentIdx, Meters)> + '_ {
        // petgraph yields the newest edge first
        self.graph
            .edges(node)
            .map(move |edge| {
                let next = if edge.source() == node {
                    edge.target()
                } else {
                    edge.source()
                };
                let idx = *edge.weight();
                (next, idx, self.segments[idx].length)
            })
            .sorted_unstable_by_key(|&(_, idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use geo::{LineString, Point};

    use super::*;
    use crate::model::SegmentType;

    fn node(id: &str, x: f64) -> TaxiNode {
        TaxiNode::new(id.to_string(), Point::new(x, 48.72))
    }

    fn segment(id: &str, name: &str, start: &str, end: &str) -> TaxiSegment {
        TaxiSegment {
            id: id.to_string(),
            start_node: start.to_string(),
            end_node: end.to_string(),
            geometry: LineString::from(vec![(2.35, 48.72), (2.36, 48.72)]),
            segment_type: SegmentType::Taxiway,
            name: name.to_string(),
            length: 10.0,
            heading: 0.0,
        }
    }

    #[test]
    fn test_segments_are_traversable_both_ways() {
        let graph = TaxiGraph::from_parts(
            vec![node("N00000", 2.35), node("N00001", 2.36)],
            vec![segment("S00000", "W2", "N00000", "N00001")],
        )
        .unwrap();

        let a = graph.node_index("N00000").unwrap();
        let b = graph.node_index("N00001").unwrap();

        let forward: Vec<_> = graph.neighbors(a).collect();
        let backward: Vec<_> = graph.neighbors(b).collect();
        assert_eq!(forward, vec![(b, 0, 10.0)]);
        assert_eq!(backward, vec![(a, 0, 10.0)]);
        assert_eq!(graph.segments_named("W2"), &[0]);
        assert!(graph.segments_named("W3").is_empty());
    }

    #[test]
    fn test_neighbors_follow_segment_order() {
        let graph = TaxiGraph::from_parts(
            vec![node("N00000", 2.35), node("N00001", 2.36), node("N00002", 2.37)],
            vec![
                segment("S00000", "W2", "N00000", "N00001"),
                segment("S00001", "W2", "N00000", "N00001"),
                segment("S00002", "W3", "N00000", "N00002"),
            ],
        )
        .unwrap();

        let a = graph.node_index("N00000").unwrap();
        let order: Vec<SegmentIdx> = graph.neighbors(a).map(|(_, idx, _)| idx).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_unnamed_segments_are_not_routable() {
        let graph = TaxiGraph::from_parts(
            vec![node("N00000", 2.35), node("N00001", 2.36)],
            vec![segment("S00000", "", "N00000", "N00001")],
        )
        .unwrap();

        let a = graph.node_index("N00000").unwrap();
        assert_eq!(graph.neighbors(a).count(), 0);
        assert!(graph.segment_by_id("S00000").is_some());
    }

    #[test]
    fn test_unknown_node_is_rejected() {
        let result = TaxiGraph::from_parts(
            vec![node("N00000", 2.35)],
            vec![segment("S00000", "W2", "N00000", "N00009")],
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }
}
