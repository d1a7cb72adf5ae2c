use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use sheet_cutoff::{MergeSwitches, Result, RunConfig, RunSummary, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    let json = cli.command.json();

    if let Err(error) = init_logging(cli.verbose) {
        eprintln!("warning: {error}");
    }

    if let Err(error) = run(cli) {
        if json {
            let failure = json!({
                "ok": false,
                "kind": error.kind(),
                "message": error.to_string(),
            });
            println!("{failure}");
        } else {
            eprintln!("error [{}]: {error}", error.kind());
        }
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    let json = cli.command.json();
    let config = cli.command.into_config();
    let summary = sheet_cutoff::run(&config)?;

    if json {
        let payload = json!({ "ok": true, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    match &summary.output {
        Some(path) => println!("File saved to {}", path.display()),
        None => println!("Preview ({}):", summary.mode),
    }
    println!("Rows in result: {}", summary.rows);
    println!("Columns: {:?}", summary.columns);
    if let Some(style) = &summary.style {
        println!("{}", style.format("Formatting:"));
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Trim or merge spreadsheet rows around a date-time cutoff."
)]
struct Cli {
    /// Log debug output to stderr unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Keep the rows of one workbook whose End Time is after the cutoff,
    /// preserving formatting.
    Trim(TrimArgs),
    /// Combine File 1 and File 2 around the cutoff, de-duplicated by id.
    Merge(MergeArgs),
}

impl Command {
    fn json(&self) -> bool {
        match self {
            Command::Trim(args) => args.common.json,
            Command::Merge(args) => args.common.json,
        }
    }

    fn into_config(self) -> RunConfig {
        match self {
            Command::Trim(args) => {
                let config = RunConfig::trim(args.input, args.common.cutoff);
                with_output(config, args.common.output)
            }
            Command::Merge(args) => {
                let switches = MergeSwitches {
                    remove_before_cutoff: args.remove_before_cutoff,
                    append_replace: args.append_replace,
                };
                let config = RunConfig::merge(args.file1, args.file2, args.common.cutoff, switches);
                with_output(config, args.common.output)
            }
        }
    }
}

fn with_output(config: RunConfig, output: Option<PathBuf>) -> RunConfig {
    match output {
        Some(path) => config.with_output(path),
        None => config,
    }
}

#[derive(clap::Args)]
struct CommonArgs {
    /// Cutoff date-time, YYYY-MM-DD HH:MM.
    #[arg(long)]
    cutoff: String,

    /// Output workbook path. Without it the run is a preview and nothing is
    /// written.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct TrimArgs {
    /// Workbook to trim.
    #[arg(long)]
    input: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(clap::Args)]
struct MergeArgs {
    /// File 1, where changes happen.
    #[arg(long)]
    file1: PathBuf,

    /// File 2, the rows taken over at or after the cutoff.
    #[arg(long)]
    file2: PathBuf,

    /// Drop File 1 rows before the cutoff.
    #[arg(long)]
    remove_before_cutoff: bool,

    /// Append File 2 rows at or after the cutoff, replacing File 1 rows with
    /// the same id.
    #[arg(long)]
    append_replace: bool,

    #[command(flatten)]
    common: CommonArgs,
}
