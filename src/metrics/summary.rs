use crate::graph::ir::DepGraph;
use crate::metrics::fanout::{fan_in, fan_out, is_isolated};
use serde::Serialize;

/// Advisory statistics for a built graph. They never change its structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub isolated_nodes: usize,
    pub files_with_imports: usize,
    pub mean_fanout: f64,
    pub max_fanout: usize,
    pub max_fanin: usize,
}

impl GraphStats {
    /// Compute statistics from a dependency graph.
    pub fn from_graph(graph: &DepGraph) -> Self {
        let node_count = graph.node_count();
        if node_count == 0 {
            return Self {
                node_count: 0,
                edge_count: 0,
                isolated_nodes: 0,
                files_with_imports: 0,
                mean_fanout: 0.0,
                max_fanout: 0,
                max_fanin: 0,
            };
        }

        let fanouts: Vec<usize> = graph.node_indices().map(|n| fan_out(graph, n)).collect();
        let max_fanin = graph
            .node_indices()
            .map(|n| fan_in(graph, n))
            .max()
            .unwrap_or(0);
        let isolated_nodes = graph
            .node_indices()
            .filter(|&n| is_isolated(graph, n))
            .count();
        let mean_fanout = fanouts.iter().sum::<usize>() as f64 / node_count as f64;

        Self {
            node_count,
            edge_count: graph.edge_count(),
            isolated_nodes,
            files_with_imports: fanouts.iter().filter(|&&f| f > 0).count(),
            mean_fanout: (mean_fanout * 100.0).round() / 100.0,
            max_fanout: fanouts.iter().copied().max().unwrap_or(0),
            max_fanin,
        }
    }

    /// Share of nodes with no edges at all.
    pub fn isolated_ratio(&self) -> f64 {
        if self.node_count == 0 {
            0.0
        } else {
            self.isolated_nodes as f64 / self.node_count as f64
        }
    }
}
