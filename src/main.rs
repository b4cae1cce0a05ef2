//! sharetally - per-folder ownership, size and age roll-up for UNC shares.
//!
//! Usage:
//!   sharetally scan \\server\share\path      Run the scanner and report
//!   sharetally replay FILE --root \\...      Report from a saved scanner transcript
//!   sharetally --help                        Show help

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sharetally_core::{LineFormat, MAX_PARALLEL, RollupConfig, RollupConfigBuilder, RollupError, ScanRoot};
use sharetally_report::{
    JsonReport, ReportRow, build_rows, default_output_name, render_table, write_csv, write_csv_file,
};
use sharetally_scan::{IngestDriver, RollupOutcome, ScannerCommand, replay};

#[derive(Parser)]
#[command(
    name = "sharetally",
    version,
    about = "Per-folder ownership, size and age roll-up for UNC shares",
    long_about = "sharetally runs an XCP-style scanner against a UNC path and reports, \
                  for every first-level folder, its owner, total size and the age of \
                  its most recently modified entry."
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the scanner against a UNC path and report per-folder totals
    Scan {
        /// UNC path to scan (\\server\share[\path])
        root: String,

        /// Concurrency hint passed to the scanner
        #[arg(short, long, default_value_t = 8, value_parser = clap::value_parser!(u8).range(1..=MAX_PARALLEL as i64))]
        parallel: u8,

        /// Scanner executable (defaults to `xcp` on PATH)
        #[arg(long)]
        scanner: Option<PathBuf>,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Build the report from a saved scanner transcript
    Replay {
        /// Transcript file containing scanner output
        transcript: PathBuf,

        /// UNC path the transcript was produced for
        #[arg(short, long)]
        root: String,

        #[command(flatten)]
        report: ReportArgs,
    },
}

#[derive(Args)]
struct ReportArgs {
    /// Folder level to roll up at (1 = children of the root)
    #[arg(short, long, default_value_t = 1)]
    level: usize,

    /// Record layouts to accept, in priority order (dense, legacy)
    #[arg(long, value_delimiter = ',')]
    formats: Vec<LineFormat>,

    /// CSV report path (defaults to sharetally_<server>_<share>_<time>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not write a CSV report file
    #[arg(long)]
    no_csv: bool,

    /// Format for standard output
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Scan {
            root,
            parallel,
            scanner,
            report,
        } => run_scan(root, parallel, scanner, &report),
        Command::Replay {
            transcript,
            root,
            report,
        } => run_replay(&transcript, root, &report),
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn config_builder(root: String, report: &ReportArgs) -> RollupConfigBuilder {
    let mut builder = RollupConfig::builder();
    builder.root(root).level(report.level);
    if !report.formats.is_empty() {
        builder.formats(report.formats.clone());
    }
    builder
}

/// Run the scanner and report.
fn run_scan(root: String, parallel: u8, scanner: Option<PathBuf>, report: &ReportArgs) -> Result<()> {
    let config = config_builder(root, report)
        .parallel(parallel)
        .scanner(scanner)
        .build()
        .context("Invalid configuration")?;
    debug!(?config, "resolved configuration");
    let scan_root = config.scan_root()?;

    let command = ScannerCommand::from_config(&config).context("Cannot run scanner")?;
    let mut driver = IngestDriver::new(&config)?;

    eprintln!("Scanning {scan_root}...");
    let exit_code = command.run(&mut driver).context("Scan failed")?;

    let outcome = finish(driver, exit_code)?;
    present(&scan_root, &outcome, report)
}

/// Replay a transcript and report.
fn run_replay(transcript: &Path, root: String, report: &ReportArgs) -> Result<()> {
    let config = config_builder(root, report)
        .build()
        .context("Invalid configuration")?;
    debug!(?config, "resolved configuration");
    let scan_root = config.scan_root()?;
    let mut driver = IngestDriver::new(&config)?;

    eprintln!("Replaying {}...", transcript.display());
    let exit_code = replay(transcript, &mut driver).context("Replay failed")?;

    let outcome = finish(driver, exit_code)?;
    present(&scan_root, &outcome, report)
}

/// Apply the terminal policy, echoing captured scanner errors on failure.
fn finish(driver: IngestDriver, exit_code: Option<i32>) -> Result<RollupOutcome> {
    match driver.finish(exit_code) {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            if let RollupError::ScannerFailed { errors, .. } = &err {
                for line in errors {
                    eprintln!("  {line}");
                }
            }
            Err(err).context("No folders could be aggregated")
        }
    }
}

/// Print the report and write the CSV file.
fn present(root: &ScanRoot, outcome: &RollupOutcome, report: &ReportArgs) -> Result<()> {
    let rows = build_rows(root, &outcome.folders);

    match report.format {
        OutputFormat::Text => print!("{}", render_table(&rows)),
        OutputFormat::Json => println!("{}", JsonReport::new(root, outcome, &rows).to_string_pretty()?),
        OutputFormat::Csv => {
            let stdout = std::io::stdout();
            write_csv(stdout.lock(), &rows)?;
        }
    }
    std::io::stdout().flush()?;

    print_summary(outcome);

    if !report.no_csv {
        let path = report
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_output_name(root, chrono::Local::now())));
        write_rows(&path, &rows)?;
        eprintln!("Report written to {}", path.display());
    }

    Ok(())
}

fn write_rows(path: &Path, rows: &[ReportRow]) -> Result<()> {
    write_csv_file(path, rows).with_context(|| format!("Failed to write {}", path.display()))
}

/// Print run counters to stderr.
fn print_summary(outcome: &RollupOutcome) {
    let stats = &outcome.stats;

    eprintln!();
    eprintln!("{}", "─".repeat(60));
    eprintln!(
        " {} folders, {} records from {} lines in {:.2}s",
        outcome.folders.len(),
        stats.processed,
        stats.total_lines,
        outcome.elapsed.as_secs_f64()
    );
    eprintln!(
        " {} skipped, {} filtered, {} above root, {} scanner errors",
        stats.skipped, stats.filtered, stats.excluded, stats.error_lines
    );
    if stats.unit_fallbacks > 0 {
        eprintln!(" {} size/age token(s) could not be parsed and counted as 0", stats.unit_fallbacks);
    }
    if outcome.is_partial() {
        eprintln!(
            " Scanner exited with {:?}; results may be incomplete",
            outcome.exit_code
        );
    }
    eprintln!("{}", "─".repeat(60));
}
