//! Import extraction and file-level dependency graphs for source repositories.
//!
//! The pipeline detects a repository's primary language, extracts internal
//! imports with a per-language [`parse::ImportParser`], and links them into a
//! directed graph whose nodes are files.

pub mod analyze;
pub mod cli;
pub mod config;
pub mod errors;
pub mod graph;
pub mod language;
pub mod metrics;
pub mod output;
pub mod parse;
pub mod source;
pub mod walk;
