use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use hashbrown::{HashMap, HashSet};
use log::trace;
use ordered_float::OrderedFloat;
use petgraph::graph::NodeIndex;

use super::state::State;
use crate::model::TaxiGraph;
use crate::{Meters, SegmentIdx};

/// Result of one name-restricted search
#[derive(Debug, Clone)]
pub(crate) struct LegSearch {
    start: NodeIndex,
    distances: HashMap<NodeIndex, Meters>,
    predecessors: HashMap<NodeIndex, (NodeIndex, SegmentIdx)>,
}

impl LegSearch {
    pub(crate) fn distance(&self, node: NodeIndex) -> Option<Meters> {
        self.distances.get(&node).copied()
    }

    /// Segments from the search start to `target`, in travel order
    pub(crate) fn segments_to(&self, target: NodeIndex) -> Option<Vec<SegmentIdx>> {
        if !self.distances.contains_key(&target) {
            return None;
        }
        let mut segments = Vec::new();
        let mut current = target;
        while current != self.start {
            let &(prev, segment) = self.predecessors.get(&current)?;
            segments.push(segment);
            current = prev;
        }
        segments.reverse();
        Some(segments)
    }
}

/// Dijkstra from `start` over segments whose name is in `allowed` and which
/// are not set in `used`.
///
/// The search stops once every target has been settled or the frontier is
/// exhausted. Equal costs are settled in push order.
pub(crate) fn constrained_dijkstra(
    graph: &TaxiGraph,
    start: NodeIndex,
    targets: &[NodeIndex],
    allowed: &[&str],
    used: &FixedBitSet,
) -> LegSearch {
    let mut distances: HashMap<NodeIndex, Meters> = HashMap::new();
    let mut predecessors: HashMap<NodeIndex, (NodeIndex, SegmentIdx)> = HashMap::new();
    let mut heap = BinaryHeap::new();
    let mut seq: u64 = 0;

    let pending: HashSet<NodeIndex> = targets.iter().copied().collect();
    let mut settled_targets: HashSet<NodeIndex> = HashSet::with_capacity(pending.len());

    heap.push(State {
        cost: OrderedFloat(0.0),
        seq,
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node, .. }) = heap.pop() {
        let cost = cost.into_inner();

        // Skip if we've found a better path
        if let Some(&best) = distances.get(&node)
            && cost > best
        {
            continue;
        }

        if pending.contains(&node) {
            settled_targets.insert(node);
            if settled_targets.len() == pending.len() {
                break;
            }
        }

        for (next, segment_idx, length) in graph.neighbors(node) {
            if used.contains(segment_idx) {
                continue;
            }
            if !allowed.contains(&graph.segment(segment_idx).name.as_str()) {
                continue;
            }

            let next_cost = cost + length;
            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                    } else {
                        continue;
                    }
                }
            }
            predecessors.insert(next, (node, segment_idx));
            seq += 1;
            heap.push(State {
                cost: OrderedFloat(next_cost),
                seq,
                node: next,
            });
        }
    }

    trace!(
        "Leg search from {:?} reached {} nodes, {} of {} targets",
        start,
        distances.len(),
        settled_targets.len(),
        pending.len()
    );

    LegSearch {
        start,
        distances,
        predecessors,
    }
}
