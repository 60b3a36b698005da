use crate::analyze::build_repository_graph;
use crate::config::{resolve_config, CliOverrides};
use crate::errors::Result;
use crate::output::OutputFormat;
use crate::parse::ParserRegistry;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct GraphArgs {
    /// Repository root to analyze
    pub path: PathBuf,

    /// Language to use instead of detecting one
    #[arg(long)]
    pub lang: Option<String>,

    /// Output format
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// JSON file mapping host language names to byte counts
    #[arg(long)]
    pub stats: Option<PathBuf>,

    /// Maximum number of files to analyze
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Files larger than this many bytes keep their node but lose their imports
    #[arg(long)]
    pub max_file_bytes: Option<u64>,

    /// Exclude glob patterns
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Suppress progress output and warnings on stderr
    #[arg(long)]
    pub quiet: bool,
}

impl GraphArgs {
    fn to_cli_overrides(&self) -> CliOverrides {
        CliOverrides {
            lang: self.lang.clone(),
            max_files: self.max_files,
            max_file_bytes: self.max_file_bytes,
            exclude: self.exclude.clone(),
        }
    }
}

fn fetch_progress() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

pub fn run(args: &GraphArgs) -> Result<()> {
    let source = super::open_source(&args.path, args.stats.as_deref())?;
    let config = resolve_config(source.root(), &args.to_cli_overrides())?;
    let languages = config.language_registry()?;
    let parsers = ParserRegistry::builtin(&languages);

    let progress = (!args.quiet).then(fetch_progress);
    let report = build_repository_graph(
        &source,
        &languages,
        &parsers,
        &config.analyze_options(),
        progress.as_ref(),
    )?;

    let mut stdout = std::io::stdout().lock();
    match args.format {
        OutputFormat::Json => crate::output::json::write_report_json(&mut stdout, &report)?,
        OutputFormat::Text => crate::output::text::write_report_text(&mut stdout, &report)?,
        OutputFormat::Dot => {
            crate::output::dot::write_dot(&mut stdout, &report.nodes, &report.edges)?;
            // DOT has nowhere to carry warnings
            if !args.quiet {
                let mut stderr = std::io::stderr().lock();
                for warning in &report.warnings {
                    writeln!(stderr, "warning: {warning}")?;
                }
            }
        }
    }

    Ok(())
}
