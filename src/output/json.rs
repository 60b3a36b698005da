use crate::analyze::GraphReport;
use crate::errors::Result;
use crate::language::LanguageDetection;
use std::io::Write;

/// Write the full graph report as JSON.
pub fn write_report_json<W: Write>(writer: &mut W, report: &GraphReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}

/// Write a detection verdict as JSON.
pub fn write_detection_json<W: Write>(writer: &mut W, detection: &LanguageDetection) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, detection)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::build_repository_graph;
    use crate::language::{DetectionMethod, LanguageRegistry};
    use crate::parse::ParserRegistry;
    use crate::source::InMemorySource;

    #[test]
    fn report_json_has_every_section() {
        let languages = LanguageRegistry::builtin();
        let parsers = ParserRegistry::builtin(&languages);
        let source = InMemorySource::new()
            .with_file("pkg/mod.py", "from . import sibling\n")
            .with_file("pkg/sibling.py", "");
        let report =
            build_repository_graph(&source, &languages, &parsers, &Default::default(), None)
                .unwrap();

        let mut out = Vec::new();
        write_report_json(&mut out, &report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["metadata"]["language"], "python");
        assert_eq!(value["metadata"]["method"], "extension-count");
        assert_eq!(value["metadata"]["evidence"]["kind"], "extension-counts");
        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(value["edges"][0]["source"], "pkg/mod.py");
        assert_eq!(value["edges"][0]["target"], "pkg/sibling.py");
        assert_eq!(value["nodes"][1]["imported_by"][0], "pkg/mod.py");
        assert!(value["warnings"].as_array().unwrap().is_empty());
        assert_eq!(value["stats"]["edge_count"], 1);
    }

    #[test]
    fn detection_json_uses_kebab_case_methods() {
        let detection = LanguageDetection {
            language: "go".into(),
            confidence: 0.8,
            method: DetectionMethod::ManifestMatch,
            evidence: None,
        };
        let mut out = Vec::new();
        write_detection_json(&mut out, &detection).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["method"], "manifest-match");
        assert!(value.get("evidence").is_none());
    }
}
