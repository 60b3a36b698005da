use crate::graph::ir::{DepGraph, GraphEdge, GraphNode, NodeId};
use crate::language::LanguageProfile;
use crate::parse::paths::{self, PathIndex};
use crate::parse::ImportParser;
use rayon::prelude::*;
use std::collections::HashMap;

/// A file handed to the builder. Empty content means the file could not be
/// fetched or was skipped; it still becomes a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Import matched to a known node, ready for linking.
#[derive(Debug, Clone)]
struct MatchedImport {
    target: String,
    line: usize,
}

/// Result of parsing a single file (collected from parallel workers).
struct FileParseResult {
    source: String,
    matched: Vec<MatchedImport>,
    unresolved: usize,
}

/// Builds a DepGraph from source files with node and edge deduplication.
pub struct GraphBuilder<'p> {
    parser: &'p dyn ImportParser,
    /// Category source when the parser belongs to another language
    profile: Option<&'p LanguageProfile>,
    graph: DepGraph,
    node_map: HashMap<String, NodeId>,
    files_parsed: usize,
    unresolved_imports: usize,
}

/// The finished graph plus the counters gathered while building it.
#[derive(Debug, Clone)]
pub struct BuiltGraph {
    pub graph: DepGraph,
    pub node_map: HashMap<String, NodeId>,
    pub files_parsed: usize,
    pub unresolved_imports: usize,
}

impl<'p> GraphBuilder<'p> {
    pub fn new(parser: &'p dyn ImportParser) -> Self {
        Self {
            parser,
            profile: None,
            graph: DepGraph::new(),
            node_map: HashMap::new(),
            files_parsed: 0,
            unresolved_imports: 0,
        }
    }

    /// Classify nodes with `profile` instead of the parser's own rules.
    pub fn with_profile(mut self, profile: &'p LanguageProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Get or create the node for a path.
    pub fn ensure_node(&mut self, path: &str) -> NodeId {
        if let Some(&idx) = self.node_map.get(path) {
            return idx;
        }
        let category = match self.profile {
            Some(profile) => profile.classify(path),
            None => self.parser.classify(path),
        };
        let idx = self.graph.add_node(GraphNode {
            path: path.to_string(),
            category,
        });
        self.node_map.insert(path.to_string(), idx);
        idx
    }

    /// Link `source` → `target` if both are nodes.
    ///
    /// Repeated imports of the same target accumulate on one edge. Returns
    /// false when either endpoint is unknown or the import points at itself.
    pub fn add_import(&mut self, source: &str, target: &str, line: usize) -> bool {
        let (Some(&source_idx), Some(&target_idx)) =
            (self.node_map.get(source), self.node_map.get(target))
        else {
            return false;
        };
        if source_idx == target_idx {
            return false;
        }

        if let Some(edge_idx) = self.graph.find_edge(source_idx, target_idx) {
            let edge = &mut self.graph[edge_idx];
            if !edge.lines.contains(&line) {
                edge.lines.push(line);
            }
            edge.weight += 1;
        } else {
            self.graph.add_edge(
                source_idx,
                target_idx,
                GraphEdge {
                    lines: vec![line],
                    weight: 1,
                },
            );
        }
        true
    }

    /// Create every node, then parse and link all files with content.
    pub fn add_files(&mut self, files: &[SourceFile]) {
        let normalized: Vec<(String, &str)> = files
            .iter()
            .map(|f| (paths::normalize(&f.path), f.content.as_str()))
            .collect();

        // Nodes first: any file may be an import target.
        for (path, _) in &normalized {
            self.ensure_node(path);
        }
        let known = PathIndex::new(self.node_map.keys());
        let parser = self.parser;

        let results: Vec<FileParseResult> = normalized
            .par_iter()
            .filter(|(_, content)| !content.trim().is_empty())
            .map(|(path, content)| parse_file(parser, path, content, &known))
            .collect();

        // Sequential linking (not parallelizable due to shared mutable state)
        for result in results {
            self.files_parsed += 1;
            self.unresolved_imports += result.unresolved;
            for import in &result.matched {
                self.add_import(&result.source, &import.target, import.line);
            }
        }
    }

    /// Consume the builder and return the built graph.
    pub fn build(self) -> BuiltGraph {
        BuiltGraph {
            graph: self.graph,
            node_map: self.node_map,
            files_parsed: self.files_parsed,
            unresolved_imports: self.unresolved_imports,
        }
    }
}

fn parse_file(
    parser: &dyn ImportParser,
    path: &str,
    content: &str,
    known: &PathIndex,
) -> FileParseResult {
    let mut matched = Vec::new();
    let mut unresolved = 0;

    for raw in parser.parse_imports(content, path) {
        let target = parser
            .resolve_import_path(&raw, path)
            .and_then(|guess| parser.match_import(&raw, &guess, known));
        match target {
            Some(target) => matched.push(MatchedImport {
                target,
                line: raw.line,
            }),
            None => unresolved += 1,
        }
    }

    tracing::trace!(file = path, matched = matched.len(), unresolved, "parsed imports");
    FileParseResult {
        source: path.to_string(),
        matched,
        unresolved,
    }
}

/// Build a graph for `files` with a single parser.
pub fn build_graph(parser: &dyn ImportParser, files: &[SourceFile]) -> BuiltGraph {
    let mut builder = GraphBuilder::new(parser);
    builder.add_files(files);
    builder.build()
}

/// Like [`build_graph`], but node categories come from `profile`.
///
/// Used when the repository's language has no parser of its own and
/// imports are extracted by a fallback.
pub fn build_graph_with_profile(
    parser: &dyn ImportParser,
    profile: &LanguageProfile,
    files: &[SourceFile],
) -> BuiltGraph {
    let mut builder = GraphBuilder::new(parser).with_profile(profile);
    builder.add_files(files);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ir;
    use crate::language::LanguageRegistry;
    use crate::parse::ParserRegistry;
    use pretty_assertions::assert_eq;

    fn build(language: &str, files: &[SourceFile]) -> BuiltGraph {
        let languages = LanguageRegistry::builtin();
        let parsers = ParserRegistry::builtin(&languages);
        let parser = parsers.get_parser(language);
        build_graph(parser.as_ref(), files)
    }

    #[test]
    fn typescript_relative_import_links_both_ways() {
        let built = build(
            "javascript",
            &[
                SourceFile::new("src/a.ts", "import {x} from \"./b\""),
                SourceFile::new("src/b.ts", ""),
            ],
        );
        assert_eq!(built.graph.node_count(), 2);
        assert_eq!(built.graph.edge_count(), 1);

        let nodes = ir::file_nodes(&built.graph);
        assert_eq!(nodes[0].path, "src/a.ts");
        assert_eq!(nodes[0].imports, vec!["src/b.ts"]);
        assert_eq!(nodes[1].imported_by, vec!["src/a.ts"]);
    }

    #[test]
    fn python_sibling_import() {
        let built = build(
            "python",
            &[
                SourceFile::new("pkg/mod.py", "from . import sibling\n"),
                SourceFile::new("pkg/sibling.py", "x = 1\n"),
            ],
        );
        let edges = ir::edges(&built.graph);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "pkg/mod.py");
        assert_eq!(edges[0].target, "pkg/sibling.py");
    }

    #[test]
    fn external_import_is_dropped_silently() {
        let built = build(
            "javascript",
            &[SourceFile::new("src/index.js", "import pad from \"left-pad\";\nimport x from './missing';\n")],
        );
        assert_eq!(built.graph.node_count(), 1);
        assert_eq!(built.graph.edge_count(), 0);
        assert_eq!(built.unresolved_imports, 1);
    }

    #[test]
    fn repeated_imports_collapse_into_weighted_edge() {
        let built = build(
            "javascript",
            &[
                SourceFile::new("a.js", "import x from './b';\nconst y = require('./b');\n"),
                SourceFile::new("b.js", ""),
            ],
        );
        let edges = ir::edges(&built.graph);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].weight, 2);
        assert_eq!(edges[0].lines, vec![1, 2]);
    }

    #[test]
    fn empty_content_nodes_remain_targets() {
        let built = build(
            "javascript",
            &[
                SourceFile::new("a.js", "import './b';"),
                SourceFile::new("b.js", ""),
                SourceFile::new("c.js", ""),
            ],
        );
        assert_eq!(built.graph.node_count(), 3);
        assert_eq!(built.graph.edge_count(), 1);
        assert_eq!(built.files_parsed, 1);
    }

    #[test]
    fn self_imports_are_ignored() {
        let built = build("javascript", &[SourceFile::new("src/a.ts", "import './a';")]);
        assert_eq!(built.graph.edge_count(), 0);
    }

    #[test]
    fn duplicate_paths_create_one_node() {
        let built = build(
            "javascript",
            &[SourceFile::new("./src/a.ts", ""), SourceFile::new("src/a.ts", "")],
        );
        assert_eq!(built.graph.node_count(), 1);
    }

    #[test]
    fn nodes_carry_categories() {
        let built = build("javascript", &[SourceFile::new("src/components/Nav.tsx", "")]);
        let nodes = ir::file_nodes(&built.graph);
        assert_eq!(nodes[0].category, "component");
    }

    #[test]
    fn profile_categories_override_fallback_parser() {
        let languages = LanguageRegistry::builtin();
        let parsers = ParserRegistry::builtin(&languages);
        let parser = parsers.get_parser("go");
        let go = languages.lookup("go").unwrap();
        let built = build_graph_with_profile(
            parser.as_ref(),
            go,
            &[
                SourceFile::new("cmd/server/main.go", "package main"),
                SourceFile::new("internal/models/user.go", "package models"),
            ],
        );
        let categories: Vec<_> = ir::file_nodes(&built.graph)
            .into_iter()
            .map(|n| (n.path, n.category))
            .collect();
        assert_eq!(
            categories,
            vec![
                ("cmd/server/main.go".to_string(), "entry".to_string()),
                ("internal/models/user.go".to_string(), "model".to_string()),
            ]
        );
    }
}
