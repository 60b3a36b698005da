use crate::errors::Result;
use crate::graph::{Edge, FileNode};
use std::io::Write;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Write the import graph in Graphviz DOT format.
pub fn write_dot<W: Write>(writer: &mut W, nodes: &[FileNode], edges: &[Edge]) -> Result<()> {
    writeln!(writer, "digraph dependencies {{")?;
    writeln!(writer, "    rankdir=LR;")?;
    writeln!(
        writer,
        "    node [shape=box, style=filled, fillcolor=lightblue];"
    )?;
    writeln!(writer)?;

    for node in nodes {
        writeln!(
            writer,
            "    {} [tooltip={}];",
            quote(&node.path),
            quote(&node.category)
        )?;
    }
    writeln!(writer)?;

    for edge in edges {
        if edge.weight > 1 {
            writeln!(
                writer,
                "    {} -> {} [label=\"{} refs\"];",
                quote(&edge.source),
                quote(&edge.target),
                edge.weight
            )?;
        } else {
            writeln!(writer, "    {} -> {};", quote(&edge.source), quote(&edge.target))?;
        }
    }

    writeln!(writer, "}}")?;
    Ok(())
}
