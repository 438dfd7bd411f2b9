use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use petgraph::graph::NodeIndex;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(super) struct State {
    pub(super) cost: OrderedFloat<f64>,
    /// Push order, breaks ties between equal costs
    pub(super) seq: u64,
    pub(super) node: NodeIndex,
}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost, then first pushed first out
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
