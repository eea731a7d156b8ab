mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::analyze::AnalyzeArgs;
use commands::derived::{
    DuplicatesArgs, ExpectedArgs, MantissasArgs, RollingArgs, SecondOrderArgs, SummationArgs,
};

/// Benford's Law conformity testing
#[derive(Parser)]
#[command(
    name = "benford",
    version,
    about = "Benford's Law conformity testing",
    long_about = "Runs the first, first-two, first-three, second and last-two digit tests \
                  over a numeric column, with Z-score, chi-square, Kolmogorov-Smirnov, \
                  MAD and MSE statistics, plus second-order, summation, duplicates, \
                  rolling-window and mantissa tests."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log session progress to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the five digit tests, optionally with second-order and summation
    Analyze(AnalyzeArgs),
    /// Digit test on the sorted differences of the sample
    SecondOrder(SecondOrderArgs),
    /// Summation test for F1D, F2D or F3D
    Summation(SummationArgs),
    /// Rank repeated values by repetition count
    Duplicates(DuplicatesArgs),
    /// Rolling-window MAD or MSE
    Rolling(RollingArgs),
    /// Mantissa moments and arc test
    Mantissas(MantissasArgs),
    /// Print the expected Benford distribution for a test
    Expected(ExpectedArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::analyze::run_analyze(args),
        Commands::SecondOrder(args) => commands::derived::run_second_order(args),
        Commands::Summation(args) => commands::derived::run_summation(args),
        Commands::Duplicates(args) => commands::derived::run_duplicates(args),
        Commands::Rolling(args) => commands::derived::run_rolling(args),
        Commands::Mantissas(args) => commands::derived::run_mantissas(args),
        Commands::Expected(args) => commands::derived::run_expected(args),
        Commands::Version => {
            println!("benford {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
