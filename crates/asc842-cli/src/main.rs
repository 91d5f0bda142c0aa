mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::export::{ExportArgs, ExportScheduleArgs};
use commands::lease_accounting::{
    AmortizationArgs, ClassifyArgs, InitialRecognitionArgs, RemeasureArgs, UnifiedArgs,
};
use commands::treasury::TreasuryRatesArgs;

/// ASC 842 lessee lease accounting
#[derive(Parser)]
#[command(
    name = "asc842",
    version,
    about = "ASC 842 lessee lease accounting",
    long_about = "A CLI for ASC 842 lessee lease accounting with decimal precision. \
                  Classifies leases, measures the initial liability and ROU asset, \
                  builds amortization schedules and journal entries, remeasures \
                  modified leases, and exports the results to Excel."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a lease as finance or operating
    Classify(ClassifyArgs),
    /// Measure the initial lease liability and ROU asset
    InitialRecognition(InitialRecognitionArgs),
    /// Generate the monthly amortization schedule
    Amortization(AmortizationArgs),
    /// Classify, measure, amortize and journalize in one run
    Unified(UnifiedArgs),
    /// Remeasure a lease after a modification
    Remeasure(RemeasureArgs),
    /// Show the Treasury yield curve used for the risk-free rate
    TreasuryRates(TreasuryRatesArgs),
    /// Write the complete analysis workbook (.xlsx)
    Export(ExportArgs),
    /// Write the amortization schedule workbook (.xlsx)
    ExportSchedule(ExportScheduleArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Classify(args) => commands::lease_accounting::run_classify(args),
        Commands::InitialRecognition(args) => {
            commands::lease_accounting::run_initial_recognition(args)
        }
        Commands::Amortization(args) => commands::lease_accounting::run_amortization(args),
        Commands::Unified(args) => commands::lease_accounting::run_unified(args),
        Commands::Remeasure(args) => commands::lease_accounting::run_remeasure(args),
        Commands::TreasuryRates(args) => commands::treasury::run_treasury_rates(args),
        Commands::Export(args) => commands::export::run_export(args),
        Commands::ExportSchedule(args) => commands::export::run_export_schedule(args),
        Commands::Version => {
            println!("asc842 {}", env!("CARGO_PKG_VERSION"));
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
