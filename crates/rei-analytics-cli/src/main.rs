mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::brrr::{BrrrArgs, MaoArgs, Rule70Args};
use commands::flip::FlipArgs;
use commands::investment::{AnalyzeArgs, CompareArgs};

/// Deterministic real-estate investment returns analysis
#[derive(Parser)]
#[command(
    name = "reia",
    version,
    about = "Deterministic real-estate investment returns analysis",
    long_about = "A CLI for analyzing rental acquisitions, BRRR deals, and \
                  fix-and-flips with decimal precision. Produces amortization \
                  figures, NOI and cap rates, multi-year projections, IRR, \
                  and multi-property rankings."
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
    /// Analyze a buy-and-hold rental purchase
    Analyze(AnalyzeArgs),
    /// Analyze a buy-renovate-refinance-rent deal
    Brrr(BrrrArgs),
    /// Rank a batch of properties across cap rate, cash-on-cash, IRR and ROI
    Compare(CompareArgs),
    /// Analyze a fix-and-flip deal
    Flip(FlipArgs),
    /// Maximum offer under the 70% rule
    Rule70(Rule70Args),
    /// Maximum allowable offer from ARV, repairs, profit and closing costs
    Mao(MaoArgs),
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
        Commands::Analyze(args) => commands::investment::run_analyze(args),
        Commands::Brrr(args) => commands::brrr::run_brrr(args),
        Commands::Compare(args) => commands::investment::run_compare(args),
        Commands::Flip(args) => commands::flip::run_flip(args),
        Commands::Rule70(args) => commands::brrr::run_rule70(args),
        Commands::Mao(args) => commands::brrr::run_mao(args),
        Commands::Version => {
            println!("reia {}", env!("CARGO_PKG_VERSION"));
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
