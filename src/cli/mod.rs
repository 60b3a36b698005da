pub mod detect;
pub mod graph;
pub mod languages;

use crate::errors::Result;
use crate::walk::{read_stats_file, LocalSource};
use clap::{Parser, Subcommand};
use std::path::Path;

#[derive(Debug, Parser)]
#[command(
    name = "repograph",
    version,
    about = "File-level import graph builder for JavaScript/TypeScript and Python repositories"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the import graph of a repository
    Graph(graph::GraphArgs),
    /// Report the repository's primary language
    Detect(detect::DetectArgs),
    /// List registered language profiles
    Languages(languages::LanguagesArgs),
}

/// Dispatch to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Graph(args) => graph::run(&args),
        Commands::Detect(args) => detect::run(&args),
        Commands::Languages(args) => languages::run(&args),
    }
}

/// Open a local repository, attaching host statistics when a file is given.
fn open_source(path: &Path, stats: Option<&Path>) -> Result<LocalSource> {
    let source = LocalSource::open(path)?;
    match stats {
        Some(stats_path) => Ok(source.with_stats(read_stats_file(stats_path)?)),
        None => Ok(source),
    }
}
