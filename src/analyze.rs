//! End-to-end graph construction for one repository.
//!
//! Upstream trouble (listing, statistics, individual fetches) never aborts a
//! run; it degrades the result and is reported through `warnings`.

use crate::errors::Result;
use crate::graph::{build_graph_with_profile, ir, Edge, FileNode, SourceFile};
use crate::language::{LanguageDetection, LanguageDetector, LanguageRegistry};
use crate::metrics::GraphStats;
use crate::parse::ParserRegistry;
use crate::source::{EntryKind, RepoSource, TreeEntry, TreeListing};
use globset::{Glob, GlobSet, GlobSetBuilder};
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;

pub const DEFAULT_MAX_FILES: usize = 1000;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 500_000;
pub const DEFAULT_ISOLATED_WARNING_RATIO: f64 = 0.5;
pub const DEFAULT_MIN_NODES_FOR_ISOLATION_WARNING: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Limits {
    /// Files beyond this many (after sorting) are dropped before fetching
    pub max_files: usize,
    /// Larger files become nodes without content
    pub max_file_bytes: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeOptions {
    pub language_override: Option<String>,
    pub limits: Limits,
    pub exclude_globs: Vec<String>,
    pub isolated_warning_ratio: f64,
    pub min_nodes_for_isolation_warning: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            language_override: None,
            limits: Limits::default(),
            exclude_globs: Vec::new(),
            isolated_warning_ratio: DEFAULT_ISOLATED_WARNING_RATIO,
            min_nodes_for_isolation_warning: DEFAULT_MIN_NODES_FOR_ISOLATION_WARNING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    #[serde(flatten)]
    pub detection: LanguageDetection,
    pub language_name: String,
    pub files_listed: usize,
    pub files_analyzed: usize,
    pub files_fetched: usize,
    pub files_skipped: usize,
    pub unresolved_imports: usize,
}

/// The graph plus everything a caller needs to judge how far to trust it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphReport {
    pub nodes: Vec<FileNode>,
    pub edges: Vec<Edge>,
    pub metadata: ReportMetadata,
    pub stats: GraphStats,
    pub warnings: Vec<String>,
}

/// Listing and language verdict for a repository, with any degradation
/// recorded as warnings.
#[derive(Debug, Clone)]
pub struct RepositoryScan {
    pub listing: TreeListing,
    pub detection: LanguageDetection,
    pub warnings: Vec<String>,
}

/// List the tree and detect the primary language.
///
/// A failed listing leaves an empty tree and a warning. Missing statistics
/// fall through to the file-based signals.
pub fn scan_repository(
    source: &dyn RepoSource,
    languages: &LanguageRegistry,
    language_override: Option<&str>,
) -> RepositoryScan {
    let mut warnings = Vec::new();

    let listing = match source.list_tree() {
        Ok(listing) => listing,
        Err(e) => {
            tracing::warn!("tree listing failed: {e}");
            warnings.push(format!("Could not list repository files: {e}"));
            TreeListing::default()
        }
    };
    if listing.truncated {
        warnings.push(
            "Repository listing was truncated; the graph covers only the files that were listed"
                .to_string(),
        );
    }

    let stats = match source.language_stats() {
        Ok(stats) => stats,
        Err(e) => {
            tracing::debug!("language statistics unavailable: {e}");
            None
        }
    };

    let detection = LanguageDetector::new(languages).detect(
        &listing.file_paths(),
        stats.as_ref(),
        language_override,
    );
    tracing::debug!(
        language = %detection.language,
        method = %detection.method,
        confidence = detection.confidence,
        "detected language"
    );

    RepositoryScan {
        listing,
        detection,
        warnings,
    }
}

enum FetchOutcome {
    Fetched,
    TooLarge,
    Failed,
}

fn build_excludes(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Build the import graph of `source`.
///
/// Only an invalid exclude glob is an error. Everything else ends up in
/// [`GraphReport::warnings`].
pub fn build_repository_graph(
    source: &dyn RepoSource,
    languages: &LanguageRegistry,
    parsers: &ParserRegistry,
    options: &AnalyzeOptions,
    progress: Option<&ProgressBar>,
) -> Result<GraphReport> {
    let excludes = build_excludes(&options.exclude_globs)?;
    let RepositoryScan {
        listing,
        detection,
        mut warnings,
    } = scan_repository(source, languages, options.language_override.as_deref());
    let files_listed = listing.file_paths().len();

    let profile = match languages.lookup(&detection.language) {
        Some(profile) => profile,
        None => {
            let fallback = languages.default_profile();
            warnings.push(format!(
                "Unknown language '{}'; selecting files with the {} profile",
                detection.language, fallback.name
            ));
            fallback
        }
    };

    let mut candidates: Vec<&TreeEntry> = listing
        .entries
        .iter()
        .filter(|e| e.kind == EntryKind::File)
        .filter(|e| profile.matches_extension(&e.path))
        .filter(|e| !profile.is_excluded(&e.path))
        .filter(|e| !excludes.is_match(&e.path))
        .collect();
    candidates.sort_by(|a, b| a.path.cmp(&b.path));

    if candidates.is_empty() {
        warnings.push(format!("No {} source files found", profile.name));
    }
    let max_files = options.limits.max_files;
    if candidates.len() > max_files {
        warnings.push(format!(
            "Analyzed only the first {max_files} of {} {} files",
            candidates.len(),
            profile.name
        ));
        candidates.truncate(max_files);
    }
    let files_analyzed = candidates.len();

    let max_bytes = options.limits.max_file_bytes;
    let (to_fetch, oversized): (Vec<&TreeEntry>, Vec<&TreeEntry>) = candidates
        .into_iter()
        .partition(|e| e.size.is_none_or(|size| size <= max_bytes));

    if let Some(pb) = progress {
        pb.set_length(to_fetch.len() as u64);
    }
    let fetched: Vec<(SourceFile, FetchOutcome)> = to_fetch
        .par_iter()
        .map(|entry| {
            let result = source.fetch_file(&entry.path);
            if let Some(pb) = progress {
                pb.inc(1);
            }
            match result {
                Ok(file) if file.size > max_bytes => {
                    tracing::debug!("dropping content of {} ({} bytes)", entry.path, file.size);
                    (SourceFile::new(&entry.path, ""), FetchOutcome::TooLarge)
                }
                Ok(file) => (
                    SourceFile::new(&entry.path, file.content),
                    FetchOutcome::Fetched,
                ),
                Err(e) => {
                    tracing::debug!("fetch failed: {e}");
                    (SourceFile::new(&entry.path, ""), FetchOutcome::Failed)
                }
            }
        })
        .collect();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let mut files_fetched = 0;
    let mut too_large = oversized.len();
    let mut failed = 0;
    let mut files: Vec<SourceFile> = Vec::with_capacity(files_analyzed);
    for (file, outcome) in fetched {
        match outcome {
            FetchOutcome::Fetched => files_fetched += 1,
            FetchOutcome::TooLarge => too_large += 1,
            FetchOutcome::Failed => failed += 1,
        }
        files.push(file);
    }
    files.extend(oversized.iter().map(|e| SourceFile::new(&e.path, "")));

    if too_large > 0 {
        warnings.push(format!(
            "Skipped {too_large} file(s) larger than {max_bytes} bytes"
        ));
    }
    if failed > 0 {
        warnings.push(format!(
            "Could not fetch {failed} file(s); they appear in the graph without imports"
        ));
    }

    let parser = parsers.get_parser(&detection.language);
    if !parsers.has_parser(&detection.language) {
        warnings.push(format!(
            "No import parser for '{}'; used the {} parser instead",
            detection.language,
            parser.language()
        ));
    }

    let built = build_graph_with_profile(parser.as_ref(), profile, &files);
    let stats = GraphStats::from_graph(&built.graph);
    if stats.node_count >= options.min_nodes_for_isolation_warning
        && stats.isolated_ratio() >= options.isolated_warning_ratio
    {
        warnings.push(format!(
            "{} of {} files have no internal imports; import resolution may be incomplete for this layout",
            stats.isolated_nodes, stats.node_count
        ));
    }

    tracing::info!(
        nodes = stats.node_count,
        edges = stats.edge_count,
        unresolved = built.unresolved_imports,
        "built import graph"
    );

    Ok(GraphReport {
        nodes: ir::file_nodes(&built.graph),
        edges: ir::edges(&built.graph),
        metadata: ReportMetadata {
            language_name: profile.name.clone(),
            detection,
            files_listed,
            files_analyzed,
            files_fetched,
            files_skipped: too_large + failed,
            unresolved_imports: built.unresolved_imports,
        },
        stats,
        warnings,
    })
}
