use crate::analyze::GraphReport;
use crate::errors::Result;
use std::io::Write;

/// Write the graph report as human-readable text.
pub fn write_report_text<W: Write>(writer: &mut W, report: &GraphReport) -> Result<()> {
    let meta = &report.metadata;
    let stats = &report.stats;

    writeln!(writer, "Repograph Report")?;
    writeln!(writer, "================")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "Language:   {} ({}, {}, confidence {:.2})",
        meta.language_name, meta.detection.language, meta.detection.method, meta.detection.confidence
    )?;
    writeln!(writer, "Listed:     {} files", meta.files_listed)?;
    writeln!(writer, "Analyzed:   {} files", meta.files_analyzed)?;
    writeln!(writer, "Fetched:    {} files", meta.files_fetched)?;
    writeln!(writer, "Skipped:    {} files", meta.files_skipped)?;
    writeln!(writer, "Unresolved: {} imports", meta.unresolved_imports)?;
    writeln!(writer)?;

    writeln!(writer, "Summary")?;
    writeln!(writer, "-------")?;
    writeln!(writer, "Nodes:    {}", stats.node_count)?;
    writeln!(writer, "Edges:    {}", stats.edge_count)?;
    writeln!(
        writer,
        "Fan-out:  mean={:.2}  max={}",
        stats.mean_fanout, stats.max_fanout
    )?;
    writeln!(writer, "Fan-in:   max={}", stats.max_fanin)?;
    writeln!(
        writer,
        "Isolated: {} ({} files import something internal)",
        stats.isolated_nodes, stats.files_with_imports
    )?;
    writeln!(writer)?;

    let mut ranked: Vec<_> = report
        .nodes
        .iter()
        .filter(|n| !n.imports.is_empty() || !n.imported_by.is_empty())
        .collect();
    ranked.sort_by(|a, b| {
        b.imported_by
            .len()
            .cmp(&a.imported_by.len())
            .then(a.path.cmp(&b.path))
    });
    let limit = ranked.len().min(20);
    if limit > 0 {
        writeln!(writer, "Most Imported")?;
        writeln!(writer, "{:-<60}", "")?;
        writeln!(
            writer,
            "{:<40} {:>8} {:>8} {:>10}",
            "File", "Fan-in", "Fan-out", "Category"
        )?;
        for node in ranked.iter().take(limit) {
            writeln!(
                writer,
                "{:<40} {:>8} {:>8} {:>10}",
                node.path,
                node.imported_by.len(),
                node.imports.len(),
                node.category
            )?;
        }
        writeln!(writer)?;
    }

    if !report.warnings.is_empty() {
        writeln!(writer, "Warnings")?;
        writeln!(writer, "{:-<60}", "")?;
        for warning in &report.warnings {
            writeln!(writer, "  - {warning}")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{build_repository_graph, AnalyzeOptions};
    use crate::language::LanguageRegistry;
    use crate::parse::ParserRegistry;
    use crate::source::InMemorySource;

    fn render(source: &InMemorySource) -> String {
        let languages = LanguageRegistry::builtin();
        let parsers = ParserRegistry::builtin(&languages);
        let report = build_repository_graph(
            source,
            &languages,
            &parsers,
            &AnalyzeOptions::default(),
            None,
        )
        .unwrap();
        let mut out = Vec::new();
        write_report_text(&mut out, &report).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_lists_most_imported_files() {
        let text = render(
            &InMemorySource::new()
                .with_file("src/a.ts", "import './b';")
                .with_file("src/c.ts", "import './b';")
                .with_file("src/b.ts", ""),
        );
        assert!(text.contains("Language:   JavaScript/TypeScript (javascript, extension-count"));
        assert!(text.contains("Edges:    2"));
        let b_row = text.lines().find(|l| l.starts_with("src/b.ts")).unwrap();
        assert!(b_row.split_whitespace().nth(1) == Some("2"));
        assert!(!text.contains("Warnings"));
    }

    #[test]
    fn text_includes_warnings() {
        let text = render(&InMemorySource::new().with_listing_unavailable());
        assert!(text.contains("Warnings"));
        assert!(text.contains("Could not list repository files"));
    }
}
