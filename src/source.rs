//! Repository data providers.
//!
//! The analysis pipeline never touches a hosting API or the filesystem
//! directly; it asks a [`RepoSource`] for a tree listing, optional language
//! statistics, and individual file contents.

use crate::errors::{RepographError, Result};
use crate::language::LanguageStats;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub path: String,
    pub kind: EntryKind,
    /// Size in bytes, when the provider reports it up front
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl TreeEntry {
    pub fn file(path: impl Into<String>, size: Option<u64>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            size,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            size: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeListing {
    pub entries: Vec<TreeEntry>,
    /// The provider stopped listing before reaching every entry.
    pub truncated: bool,
}

impl TreeListing {
    pub fn file_paths(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::File)
            .map(|e| e.path.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    pub content: String,
    pub size: u64,
}

/// Everything the pipeline needs from a repository host.
///
/// Implementations must be shareable across the fetch worker pool.
pub trait RepoSource: Sync {
    /// Directory listing of the whole repository.
    fn list_tree(&self) -> Result<TreeListing>;

    /// Bytes per language as reported by the host, if it offers them.
    fn language_stats(&self) -> Result<Option<LanguageStats>>;

    /// Raw text of one file.
    fn fetch_file(&self, path: &str) -> Result<FetchedFile>;
}

/// A fixed, in-memory repository.
///
/// Useful for embedding hosts that already hold file contents, and for tests
/// that need listing or fetch failures on demand.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    files: BTreeMap<String, String>,
    stats: Option<LanguageStats>,
    truncated: bool,
    listing_unavailable: bool,
    stats_unavailable: bool,
    unfetchable: HashSet<String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    pub fn with_stats(mut self, stats: LanguageStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_truncated_listing(mut self) -> Self {
        self.truncated = true;
        self
    }

    pub fn with_listing_unavailable(mut self) -> Self {
        self.listing_unavailable = true;
        self
    }

    pub fn with_stats_unavailable(mut self) -> Self {
        self.stats_unavailable = true;
        self
    }

    /// Listed, but every fetch of this path fails.
    pub fn with_unfetchable(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.files.entry(path.clone()).or_default();
        self.unfetchable.insert(path);
        self
    }
}

impl RepoSource for InMemorySource {
    fn list_tree(&self) -> Result<TreeListing> {
        if self.listing_unavailable {
            return Err(RepographError::Fetch {
                path: "/".to_string(),
                message: "tree listing unavailable".to_string(),
            });
        }

        let mut dirs: Vec<String> = Vec::new();
        let mut entries = Vec::new();
        for (path, content) in &self.files {
            let mut prefix = String::new();
            let segments: Vec<&str> = path.split('/').collect();
            for segment in &segments[..segments.len().saturating_sub(1)] {
                if !prefix.is_empty() {
                    prefix.push('/');
                }
                prefix.push_str(segment);
                if !dirs.contains(&prefix) {
                    dirs.push(prefix.clone());
                    entries.push(TreeEntry::directory(prefix.clone()));
                }
            }
            entries.push(TreeEntry::file(path.clone(), Some(content.len() as u64)));
        }

        Ok(TreeListing {
            entries,
            truncated: self.truncated,
        })
    }

    fn language_stats(&self) -> Result<Option<LanguageStats>> {
        if self.stats_unavailable {
            return Err(RepographError::Fetch {
                path: "languages".to_string(),
                message: "statistics unavailable".to_string(),
            });
        }
        Ok(self.stats.clone())
    }

    fn fetch_file(&self, path: &str) -> Result<FetchedFile> {
        if self.unfetchable.contains(path) {
            return Err(RepographError::Fetch {
                path: path.to_string(),
                message: "fetch refused".to_string(),
            });
        }
        let content = self.files.get(path).ok_or_else(|| RepographError::Fetch {
            path: path.to_string(),
            message: "no such file".to_string(),
        })?;
        Ok(FetchedFile {
            content: content.clone(),
            size: content.len() as u64,
        })
    }
}
