use petgraph::Direction;

use crate::graph::ir::{DepGraph, NodeId};

/// Compute fan-out (out-degree) for a node.
pub fn fan_out(graph: &DepGraph, node: NodeId) -> usize {
    graph.edges_directed(node, Direction::Outgoing).count()
}

/// Compute fan-in (in-degree) for a node.
pub fn fan_in(graph: &DepGraph, node: NodeId) -> usize {
    graph.edges_directed(node, Direction::Incoming).count()
}

/// A node with neither outgoing nor incoming edges.
pub fn is_isolated(graph: &DepGraph, node: NodeId) -> bool {
    fan_out(graph, node) == 0 && fan_in(graph, node) == 0
}
