use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;

/// Unique identifier for a graph node
pub type NodeId = petgraph::graph::NodeIndex;

/// The file-level import graph
pub type DepGraph = DiGraph<GraphNode, GraphEdge>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// Canonical path relative to the repository root
    pub path: String,
    /// Label from the language's classification rules
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    /// Lines of every import statement that contributed to this edge
    pub lines: Vec<usize>,
    /// Number of import statements behind the edge
    pub weight: usize,
}

/// A node as presented to callers, with both edge directions mirrored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileNode {
    pub path: String,
    pub category: String,
    pub imports: Vec<String>,
    pub imported_by: Vec<String>,
}

/// `source` imports `target`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub weight: usize,
    pub lines: Vec<usize>,
}

/// Nodes sorted by path, with sorted neighbour lists.
pub fn file_nodes(graph: &DepGraph) -> Vec<FileNode> {
    let mut nodes: Vec<FileNode> = graph
        .node_indices()
        .map(|idx| {
            let mut imports: Vec<String> = graph
                .neighbors_directed(idx, Direction::Outgoing)
                .map(|n| graph[n].path.clone())
                .collect();
            let mut imported_by: Vec<String> = graph
                .neighbors_directed(idx, Direction::Incoming)
                .map(|n| graph[n].path.clone())
                .collect();
            imports.sort();
            imported_by.sort();
            FileNode {
                path: graph[idx].path.clone(),
                category: graph[idx].category.clone(),
                imports,
                imported_by,
            }
        })
        .collect();
    nodes.sort_by(|a, b| a.path.cmp(&b.path));
    nodes
}

/// Edges sorted by (source, target).
pub fn edges(graph: &DepGraph) -> Vec<Edge> {
    let mut out: Vec<Edge> = graph
        .edge_references()
        .map(|e| Edge {
            source: graph[e.source()].path.clone(),
            target: graph[e.target()].path.clone(),
            weight: e.weight().weight,
            lines: e.weight().lines.clone(),
        })
        .collect();
    out.sort();
    out
}
