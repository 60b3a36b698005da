//! Project-relative path arithmetic.
//!
//! Paths are forward-slash strings relative to the repository root, with no
//! leading `./` or `/`. Nothing here touches the filesystem.

use std::collections::HashSet;

/// Canonical project-relative form of a path.
pub fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    collapse(unified.split('/')).unwrap_or_default()
}

/// Directory portion of a path; empty for files at the root.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[..i],
        None => "",
    }
}

/// Join `relative` onto `dir`, collapsing `.` and `..`.
///
/// Returns `None` when the result would climb above the root.
pub fn join(dir: &str, relative: &str) -> Option<String> {
    let relative = relative.replace('\\', "/");
    collapse(dir.split('/').chain(relative.split('/')))
}

/// Walk `levels` directories up from `dir`.
pub fn ascend(dir: &str, levels: usize) -> Option<String> {
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
    if levels > segments.len() {
        return None;
    }
    segments.truncate(segments.len() - levels);
    Some(segments.join("/"))
}

fn collapse<'a>(segments: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut out: Vec<&str> = Vec::new();
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop()?;
            }
            other => out.push(other),
        }
    }
    Some(out.join("/"))
}

/// The set of paths that exist as graph nodes.
#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    paths: HashSet<String>,
}

impl PathIndex {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            paths: paths.into_iter().map(|p| normalize(p.as_ref())).collect(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// The path itself, if known.
    pub fn get(&self, path: &str) -> Option<String> {
        self.paths.get(path).cloned()
    }

    /// First candidate that names a known path.
    pub fn first_of<I, S>(&self, candidates: I) -> Option<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        candidates
            .into_iter()
            .find_map(|c| self.get(c.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
