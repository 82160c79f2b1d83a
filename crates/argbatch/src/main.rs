use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use argbatch::app::packages::SourceFilter;
use argbatch::app::partition::{PartitionOptions, Partitioner};
use argbatch::app::render::{OutputFormat, render};
use argbatch::domain::model::{CommandPrefix, Strategy};
use argbatch::infra::config::Config;

/// Split a list of paths into command invocations that fit the argument limit.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(override_usage = "argbatch [OPTIONS] [PATHS]... -- <COMMAND>...")]
struct Cli {
    /// How paths are grouped into invocations.
    #[arg(short, long, value_enum)]
    strategy: Option<Strategy>,
    /// Maximum bytes per invocation, separators included.
    #[arg(long, value_name = "BYTES")]
    max_bytes: Option<usize>,
    /// Workspace root used to resolve package names; repeat in priority order.
    #[arg(long = "search-path", value_name = "DIR")]
    search_paths: Vec<PathBuf>,
    /// Glob selecting source files; replaces the configured set.
    #[arg(long, value_name = "GLOB")]
    include: Vec<String>,
    /// Glob excluding source files; added to the configured set.
    #[arg(long, value_name = "GLOB")]
    exclude: Vec<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,
    /// Print shell completions and exit.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
    /// Paths to partition.
    paths: Vec<String>,
    /// Command and fixed flags prepended to every invocation.
    #[arg(last = true, value_name = "COMMAND")]
    command: Vec<String>,
}

fn main() -> Result<()> {
    argbatch::init();

    let cli = Cli::parse();
    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "argbatch", &mut io::stdout());
        return Ok(());
    }
    if cli.command.is_empty() {
        bail!("missing command: pass it after `--`");
    }

    let config = apply_cli(Config::load()?, &cli);
    let mut options = PartitionOptions::from_config(&config)?;
    if !cli.include.is_empty() {
        options.filter = SourceFilter::new(&cli.include, &config.sources.exclude)?;
    }

    let partitioner = Partitioner::new(options)?;
    let prefix = CommandPrefix::new(cli.command.iter().cloned());
    let parts = partitioner
        .partition(&prefix, &cli.paths)
        .with_context(|| format!("{} partitioning failed", partitioner.strategy()))?;

    let rendered = render(&parts, cli.format)?;
    let mut stdout = io::stdout().lock();
    if !rendered.is_empty() {
        writeln!(stdout, "{rendered}")?;
    }
    stdout.flush()?;
    Ok(())
}

fn apply_cli(mut config: Config, cli: &Cli) -> Config {
    if let Some(strategy) = cli.strategy {
        config.partition.set_strategy(strategy);
    }
    if let Some(bytes) = cli.max_bytes {
        config.partition.set_max_command_bytes(bytes);
    }
    if !cli.search_paths.is_empty() {
        config.resolver.search_paths = cli.search_paths.clone();
    }
    config.sources.exclude.extend(cli.exclude.iter().cloned());
    config
}
