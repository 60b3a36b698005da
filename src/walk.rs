use crate::errors::{RepographError, Result};
use crate::language::LanguageStats;
use crate::source::{FetchedFile, RepoSource, TreeEntry, TreeListing};
use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

/// A repository checked out on the local filesystem.
///
/// - Respects `.gitignore`
/// - Lists hidden files but never descends into `.git`
/// - Returns sorted, forward-slash paths relative to the root
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
    stats: Option<LanguageStats>,
}

impl LocalSource {
    /// Open a repository directory. Fails if it does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        let root = path.canonicalize().map_err(|_| RepographError::RepoNotFound {
            path: path.to_path_buf(),
        })?;
        if !root.is_dir() {
            return Err(RepographError::InvalidInput {
                reason: format!("{} is not a directory", path.display()),
            });
        }
        Ok(Self { root, stats: None })
    }

    /// Attach host-style language statistics (e.g. loaded with [`read_stats_file`]).
    pub fn with_stats(mut self, stats: LanguageStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }
}

impl RepoSource for LocalSource {
    fn list_tree(&self) -> Result<TreeListing> {
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .require_git(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();

        let mut entries = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!("skipping unreadable entry: {e}");
                    continue;
                }
            };
            let Some(relative) = self.relative(entry.path()) else {
                continue;
            };
            match entry.file_type() {
                Some(ft) if ft.is_dir() => entries.push(TreeEntry::directory(relative)),
                Some(ft) if ft.is_file() => {
                    let size = entry.metadata().ok().map(|m| m.len());
                    entries.push(TreeEntry::file(relative, size));
                }
                _ => {}
            }
        }

        // Sort for deterministic output
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(TreeListing {
            entries,
            truncated: false,
        })
    }

    fn language_stats(&self) -> Result<Option<LanguageStats>> {
        Ok(self.stats.clone())
    }

    fn fetch_file(&self, path: &str) -> Result<FetchedFile> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(RepographError::InvalidInput {
                reason: format!("path escapes repository root: {path}"),
            });
        }

        let bytes = std::fs::read(self.root.join(relative)).map_err(|e| RepographError::Fetch {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(FetchedFile {
            size: bytes.len() as u64,
            content: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Load a host language-statistics table: a JSON object of
/// language name → byte count, as returned by the GitHub languages API.
pub fn read_stats_file(path: &Path) -> Result<LanguageStats> {
    let content = std::fs::read_to_string(path).map_err(|_| {
        RepographError::Config(format!("Could not read stats file: {}", path.display()))
    })?;
    let stats: LanguageStats = serde_json::from_str(&content)?;
    Ok(stats)
}
