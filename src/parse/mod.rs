pub mod common;
pub mod ecmascript;
pub mod paths;
pub mod python;
pub mod registry;

pub use common::{ImportKind, RawImport};
pub use paths::PathIndex;
pub use registry::ParserRegistry;

/// Import parser frontend. Each language implements this.
///
/// Extraction is pattern-based and tolerant: malformed text yields whatever
/// statements could be recognised, never an error.
pub trait ImportParser: Send + Sync {
    /// Registry identifier of the language this parser handles.
    fn language(&self) -> &str;

    /// Extract imports judged internal to the project, in source order.
    fn parse_imports(&self, source: &str, file_path: &str) -> Vec<RawImport>;

    /// Guess the project-relative path an import refers to.
    /// Returns None if the import escapes the repository root.
    fn resolve_import_path(&self, raw: &RawImport, file_path: &str) -> Option<String>;

    /// Category label for a file path.
    fn classify(&self, file_path: &str) -> String;

    /// Match a resolved guess against the known paths.
    ///
    /// The default is exact equality; languages with extension or package
    /// conventions probe their own candidate list.
    fn match_import(&self, _raw: &RawImport, resolved: &str, known: &PathIndex) -> Option<String> {
        known.get(resolved)
    }
}
