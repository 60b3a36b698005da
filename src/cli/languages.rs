use crate::config::{resolve_config, CliOverrides};
use crate::errors::Result;
use crate::language::LanguageRegistry;
use crate::output::OutputFormat;
use crate::parse::ParserRegistry;
use clap::Args;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Args)]
pub struct LanguagesArgs {
    /// Output format (json or text)
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct LanguageRow<'a> {
    id: &'a str,
    name: &'a str,
    aliases: &'a [String],
    extensions: &'a [String],
    parser: bool,
}

fn rows<'a>(languages: &'a LanguageRegistry, parsers: &ParserRegistry) -> Vec<LanguageRow<'a>> {
    languages
        .list()
        .iter()
        .map(|p| LanguageRow {
            id: &p.id,
            name: &p.name,
            aliases: &p.aliases,
            extensions: &p.extensions,
            parser: parsers.has_parser(&p.id),
        })
        .collect()
}

pub fn run(args: &LanguagesArgs) -> Result<()> {
    let config = resolve_config(&std::env::current_dir()?, &CliOverrides::default())?;
    let languages = config.language_registry()?;
    let parsers = ParserRegistry::builtin(&languages);
    let rows = rows(&languages, &parsers);

    let mut stdout = std::io::stdout().lock();
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &rows)?;
            writeln!(stdout)?;
        }
        _ => {
            writeln!(
                stdout,
                "{:<12} {:<24} {:<8} {}",
                "ID", "Name", "Parser", "Extensions"
            )?;
            for row in &rows {
                writeln!(
                    stdout,
                    "{:<12} {:<24} {:<8} {}",
                    row.id,
                    row.name,
                    if row.parser { "yes" } else { "-" },
                    row.extensions.join(", ")
                )?;
            }
        }
    }
    Ok(())
}
