//! Primary-language detection.
//!
//! Signals are tried in a fixed order and the first one that yields a
//! registered language wins: manual override, provider byte statistics,
//! manifest filenames, extension counts. With no signal at all the result is
//! a low-confidence extension-count verdict for the default language.

use crate::language::registry::{extension_of, LanguageRegistry, DEFAULT_LANGUAGE};
use serde::Serialize;
use std::collections::BTreeMap;

/// Byte counts per host language name, e.g. `{"TypeScript": 48213}`.
pub type LanguageStats = BTreeMap<String, u64>;

pub const MANIFEST_CONFIDENCE: f64 = 0.8;
pub const DEFAULT_CONFIDENCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionMethod {
    ProviderStatistics,
    ManifestMatch,
    ExtensionCount,
    ManualOverride,
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            DetectionMethod::ProviderStatistics => "provider-statistics",
            DetectionMethod::ManifestMatch => "manifest-match",
            DetectionMethod::ExtensionCount => "extension-count",
            DetectionMethod::ManualOverride => "manual-override",
        };
        f.write_str(tag)
    }
}

/// Raw signal that backed a detection verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "kebab-case")]
pub enum DetectionEvidence {
    ByteCounts(LanguageStats),
    Manifests(Vec<String>),
    ExtensionCounts(BTreeMap<String, usize>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageDetection {
    pub language: String,
    pub confidence: f64,
    pub method: DetectionMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<DetectionEvidence>,
}

/// Map a hosting provider's language name onto a registry name.
///
/// Languages that share a parser collapse onto one identifier.
fn host_alias(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "javascript" | "typescript" | "vue" | "svelte" => Some("javascript"),
        "python" | "jupyter notebook" => Some("python"),
        "go" => Some("go"),
        "java" | "kotlin" => Some("java"),
        "rust" => Some("rust"),
        "ruby" => Some("ruby"),
        "php" => Some("php"),
        "c#" => Some("csharp"),
        _ => None,
    }
}

pub struct LanguageDetector<'a> {
    registry: &'a LanguageRegistry,
}

impl<'a> LanguageDetector<'a> {
    pub fn new(registry: &'a LanguageRegistry) -> Self {
        Self { registry }
    }

    /// Produce exactly one verdict. Never fails.
    pub fn detect(
        &self,
        paths: &[String],
        stats: Option<&LanguageStats>,
        manual: Option<&str>,
    ) -> LanguageDetection {
        if let Some(requested) = manual.map(str::trim).filter(|s| !s.is_empty()) {
            return self.manual_override(requested);
        }

        if let Some(found) = stats.and_then(|s| self.from_provider_stats(s)) {
            return found;
        }
        if let Some(found) = self.from_manifests(paths) {
            return found;
        }
        if let Some(found) = self.from_extensions(paths) {
            return found;
        }

        // No evidence at all: a low-confidence extension-count guess.
        tracing::debug!("no language signals, defaulting to {DEFAULT_LANGUAGE}");
        LanguageDetection {
            language: DEFAULT_LANGUAGE.to_string(),
            confidence: DEFAULT_CONFIDENCE,
            method: DetectionMethod::ExtensionCount,
            evidence: None,
        }
    }

    fn manual_override(&self, requested: &str) -> LanguageDetection {
        let language = self
            .registry
            .lookup(requested)
            .map(|p| p.id.clone())
            .unwrap_or_else(|| requested.to_lowercase());
        LanguageDetection {
            language,
            confidence: 1.0,
            method: DetectionMethod::ManualOverride,
            evidence: None,
        }
    }

    fn from_provider_stats(&self, stats: &LanguageStats) -> Option<LanguageDetection> {
        let total = stats.values().fold(0u64, |acc, &b| acc.saturating_add(b));
        if total == 0 {
            return None;
        }

        let mut top: Option<(&String, u64)> = None;
        for (name, &bytes) in stats {
            if top.is_none_or(|(_, best)| bytes > best) {
                top = Some((name, bytes));
            }
        }
        let (name, bytes) = top?;

        let candidate = host_alias(name).unwrap_or(name.as_str());
        let Some(profile) = self.registry.lookup(candidate) else {
            tracing::debug!("provider language '{name}' is not registered, falling through");
            return None;
        };

        Some(LanguageDetection {
            language: profile.id.clone(),
            confidence: (bytes as f64 / total as f64).clamp(0.0, 1.0),
            method: DetectionMethod::ProviderStatistics,
            evidence: Some(DetectionEvidence::ByteCounts(stats.clone())),
        })
    }

    fn from_manifests(&self, paths: &[String]) -> Option<LanguageDetection> {
        for profile in self.registry.list() {
            let matched: Vec<String> = paths
                .iter()
                .filter(|p| profile.is_manifest(p) && !profile.is_excluded(p))
                .cloned()
                .collect();
            if !matched.is_empty() {
                return Some(LanguageDetection {
                    language: profile.id.clone(),
                    confidence: MANIFEST_CONFIDENCE,
                    method: DetectionMethod::ManifestMatch,
                    evidence: Some(DetectionEvidence::Manifests(matched)),
                });
            }
        }
        None
    }

    fn from_extensions(&self, paths: &[String]) -> Option<LanguageDetection> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for path in paths {
            let Some(ext) = extension_of(path) else {
                continue;
            };
            if let Some(profile) = self.registry.profile_for_extension(&ext) {
                *counts.entry(profile.id.clone()).or_default() += 1;
            }
        }

        let total: usize = counts.values().sum();
        if total == 0 {
            return None;
        }

        // Highest count wins; registry priority breaks ties.
        let (winner, count) = counts.iter().min_by_key(|(id, &count)| {
            (
                std::cmp::Reverse(count),
                self.registry.priority(id).unwrap_or(usize::MAX),
            )
        })?;

        Some(LanguageDetection {
            language: winner.clone(),
            confidence: *count as f64 / total as f64,
            method: DetectionMethod::ExtensionCount,
            evidence: Some(DetectionEvidence::ExtensionCounts(counts.clone())),
        })
    }
}
