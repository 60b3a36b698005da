use crate::analyze::scan_repository;
use crate::config::{resolve_config, CliOverrides};
use crate::errors::Result;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Repository root to inspect
    pub path: PathBuf,

    /// Language to report instead of detecting one
    #[arg(long)]
    pub lang: Option<String>,

    /// JSON file mapping host language names to byte counts
    #[arg(long)]
    pub stats: Option<PathBuf>,
}

pub fn run(args: &DetectArgs) -> Result<()> {
    let source = super::open_source(&args.path, args.stats.as_deref())?;
    let overrides = CliOverrides {
        lang: args.lang.clone(),
        ..Default::default()
    };
    let config = resolve_config(source.root(), &overrides)?;
    let languages = config.language_registry()?;

    let scan = scan_repository(&source, &languages, config.lang.as_deref());
    let mut stderr = std::io::stderr().lock();
    for warning in &scan.warnings {
        writeln!(stderr, "warning: {warning}")?;
    }

    let mut stdout = std::io::stdout().lock();
    crate::output::json::write_detection_json(&mut stdout, &scan.detection)
}
