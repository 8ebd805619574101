mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::calculate::{CompoundArgs, SimpleArgs};
use commands::format::FormatInputArgs;

/// Simple and compound interest calculator
#[derive(Parser)]
#[command(
    name = "icalc",
    version,
    about = "Simple and compound interest calculator",
    long_about = "Computes final amount, interest, a period-by-period table, chart \
                  series and a simple vs. compound comparison from calculator form \
                  fields. Amounts are shown in es-CO / COP format."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log computation details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compound interest: M = P(1 + r)^n
    Compound(CompoundArgs),
    /// Simple interest with optional periodic contributions: M = P + P·r·t
    Simple(SimpleArgs),
    /// Show how an amount field displays its raw text
    FormatInput(FormatInputArgs),
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

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Compound(args) => commands::calculate::run_compound(args),
        Commands::Simple(args) => commands::calculate::run_simple(args),
        Commands::FormatInput(args) => commands::format::run_format_input(args),
        Commands::Version => {
            println!("icalc {}", env!("CARGO_PKG_VERSION"));
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
