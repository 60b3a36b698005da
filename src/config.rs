use crate::analyze::{AnalyzeOptions, Limits};
use crate::errors::{RepographError, Result};
use crate::language::{LanguageProfile, LanguageRegistry};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const PROJECT_CONFIG_FILE: &str = ".repograph.toml";

/// Configuration loaded from `.repograph.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub warnings: WarningsConfig,
    /// Extra language profiles, registered after the built-ins
    #[serde(default)]
    pub languages: Vec<LanguageProfile>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DefaultsConfig {
    pub lang: Option<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LimitsConfig {
    pub max_files: Option<usize>,
    pub max_file_bytes: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WarningsConfig {
    pub isolated_ratio: Option<f64>,
    pub min_nodes: Option<usize>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|_| {
            RepographError::Config(format!("Could not read config file: {}", path.display()))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| RepographError::Config(format!("Invalid config file: {e}")))?;
        Ok(config)
    }

    /// Find `.repograph.toml` by walking up from the given directory.
    pub fn find_project_config(start: &Path) -> Option<PathBuf> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(PROJECT_CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }
}

fn find_user_config() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("repograph").join("config.toml"))
}

/// Settings given on the command line; they win over every file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub lang: Option<String>,
    pub max_files: Option<usize>,
    pub max_file_bytes: Option<u64>,
    pub exclude: Vec<String>,
}

/// Fully resolved configuration. Only the language stays optional.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub lang: Option<String>,
    pub exclude: Vec<String>,
    pub limits: Limits,
    pub isolated_warning_ratio: f64,
    pub min_nodes_for_isolation_warning: usize,
    pub languages: Vec<LanguageProfile>,
    pub loaded_files: Vec<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let options = AnalyzeOptions::default();
        Self {
            lang: None,
            exclude: Vec::new(),
            limits: options.limits,
            isolated_warning_ratio: options.isolated_warning_ratio,
            min_nodes_for_isolation_warning: options.min_nodes_for_isolation_warning,
            languages: Vec::new(),
            loaded_files: Vec::new(),
        }
    }
}

impl ResolvedConfig {
    fn apply_file(&mut self, file: Config) {
        if file.defaults.lang.is_some() {
            self.lang = file.defaults.lang;
        }
        self.exclude.extend(file.defaults.exclude);
        if let Some(n) = file.limits.max_files {
            self.limits.max_files = n;
        }
        if let Some(n) = file.limits.max_file_bytes {
            self.limits.max_file_bytes = n;
        }
        if let Some(r) = file.warnings.isolated_ratio {
            self.isolated_warning_ratio = r;
        }
        if let Some(n) = file.warnings.min_nodes {
            self.min_nodes_for_isolation_warning = n;
        }
        self.languages.extend(file.languages);
    }

    fn apply_env(&mut self, env: &dyn Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(lang) = env("REPOGRAPH_LANG").filter(|v| !v.trim().is_empty()) {
            self.lang = Some(lang);
        }
        if let Some(raw) = env("REPOGRAPH_MAX_FILES") {
            self.limits.max_files = raw.trim().parse().map_err(|_| {
                RepographError::Config(format!("REPOGRAPH_MAX_FILES is not a number: {raw}"))
            })?;
        }
        if let Some(raw) = env("REPOGRAPH_MAX_FILE_BYTES") {
            self.limits.max_file_bytes = raw.trim().parse().map_err(|_| {
                RepographError::Config(format!("REPOGRAPH_MAX_FILE_BYTES is not a number: {raw}"))
            })?;
        }
        Ok(())
    }

    fn apply_cli(&mut self, cli: &CliOverrides) {
        if cli.lang.is_some() {
            self.lang = cli.lang.clone();
        }
        if let Some(n) = cli.max_files {
            self.limits.max_files = n;
        }
        if let Some(n) = cli.max_file_bytes {
            self.limits.max_file_bytes = n;
        }
        self.exclude.extend(cli.exclude.iter().cloned());
    }

    /// Built-in languages plus every configured profile.
    pub fn language_registry(&self) -> Result<LanguageRegistry> {
        let mut registry = LanguageRegistry::builtin();
        for profile in &self.languages {
            registry.register(profile.clone())?;
        }
        Ok(registry)
    }

    /// Pipeline options derived from this configuration.
    pub fn analyze_options(&self) -> AnalyzeOptions {
        AnalyzeOptions {
            language_override: self.lang.clone(),
            limits: self.limits.clone(),
            exclude_globs: self.exclude.clone(),
            isolated_warning_ratio: self.isolated_warning_ratio,
            min_nodes_for_isolation_warning: self.min_nodes_for_isolation_warning,
        }
    }
}

/// Resolve configuration: defaults → user config → project config → env → CLI.
pub fn resolve_config(working_dir: &Path, cli: &CliOverrides) -> Result<ResolvedConfig> {
    let user = find_user_config().filter(|p| p.exists());
    resolve_config_with(
        user.as_deref(),
        working_dir,
        &|key| std::env::var(key).ok(),
        cli,
    )
}

/// [`resolve_config`] with the user config path and environment injected.
pub fn resolve_config_with(
    user_config: Option<&Path>,
    working_dir: &Path,
    env: &dyn Fn(&str) -> Option<String>,
    cli: &CliOverrides,
) -> Result<ResolvedConfig> {
    let mut config = ResolvedConfig::default();

    if let Some(path) = user_config {
        config.apply_file(Config::load(path)?);
        config.loaded_files.push(path.to_path_buf());
    }
    if let Some(path) = Config::find_project_config(working_dir) {
        config.apply_file(Config::load(&path)?);
        tracing::debug!("loaded project config {}", path.display());
        config.loaded_files.push(path);
    }
    config.apply_env(env)?;
    config.apply_cli(cli);

    Ok(config)
}
