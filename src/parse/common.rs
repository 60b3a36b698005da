use serde::Serialize;

/// Raw import extracted from a single source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawImport {
    /// The import target as written in source (`./utils`, `pkg.models`, `..`)
    pub specifier: String,
    /// Line number of the import statement (1-indexed)
    pub line: usize,
    /// Syntactic shape of the statement
    pub kind: ImportKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    /// `import { a } from './x'` / `import x from './x'`
    Static,
    /// `import './setup'`
    SideEffect,
    /// `export { a } from './x'` / `export * from './x'`
    ReExport,
    /// `import('./x')`
    Dynamic,
    /// `require('./x')`
    Require,
    /// `import a.b.c` (Python)
    Direct,
    /// `from a.b import c` (Python)
    FromImport { module: String },
    /// `from . import c` / `from ..mod import c` (Python)
    RelativeImport {
        level: usize,
        module: Option<String>,
        name: Option<String>,
    },
}

/// 1-based line number of a byte offset.
pub fn line_at(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}
