//! reportflow - report-table ETL over a blob store

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use reportflow::config::{Config, OutputFormat, STORAGE_ROOT_ENV};
use reportflow::logging::init_logging;
use reportflow::output::render_to_stdout;
use reportflow::pipeline::{Orchestrator, Outcome, PipelineName};
use reportflow::storage::FsBlobStore;
use reportflow::transform::DEFAULT_MIN_DISTINCT;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Text => OutputFormat::Text,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Build processed/testing/testing.csv
    TestingTable,
    /// Build processed/population/population.csv
    PopulationTable,
    /// Build both tables concurrently
    All,
}

/// Build the testing and population report tables
#[derive(Parser, Debug)]
#[command(name = "reportflow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Root directory of the blob store (one sub-directory per container)
    #[arg(long, env = STORAGE_ROOT_ENV, default_value = "storage")]
    storage_root: PathBuf,

    /// Rows need more than this many distinct values to be kept
    #[arg(long, default_value_t = DEFAULT_MIN_DISTINCT)]
    min_distinct: usize,

    /// Run summary format
    #[arg(short, long, value_enum, default_value = "text")]
    format: CliOutputFormat,

    /// Print each produced table
    #[arg(long)]
    preview: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Failure) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<Outcome> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = Config::new(cli.storage_root)
        .with_min_distinct_values(cli.min_distinct)
        .with_output_format(cli.format.into())
        .with_preview(cli.preview);

    let store = FsBlobStore::new(config.storage_root.clone());
    let orchestrator = Orchestrator::new(&store, &config);

    let reports = match cli.command {
        Command::TestingTable => vec![orchestrator.run(PipelineName::Testing)],
        Command::PopulationTable => vec![orchestrator.run(PipelineName::Population)],
        Command::All => orchestrator.run_all(),
    };

    render_to_stdout(&reports, config.output_format, config.preview)?;

    if reports.iter().all(|r| r.outcome == Outcome::Success) {
        Ok(Outcome::Success)
    } else {
        Ok(Outcome::Failure)
    }
}
