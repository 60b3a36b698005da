pub mod builder;
pub mod ir;

pub use builder::{build_graph, build_graph_with_profile, BuiltGraph, GraphBuilder, SourceFile};
pub use ir::{DepGraph, Edge, FileNode};
