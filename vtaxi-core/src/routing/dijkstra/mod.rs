mod constrained;
mod state;

pub(crate) use constrained::constrained_dijkstra;
