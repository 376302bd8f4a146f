//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Parley - automated bilateral negotiation.
#[derive(Parser, Debug, Clone)]
#[command(name = "parley")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[derive(Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Play two negotiators against each other over a synthetic issue space.
    Play(PlayArgs),

    /// Print the effective strategy configuration.
    Config {
        /// Strategy configuration file (JSON). Missing fields take defaults.
        #[arg(short, long, env = "PARLEY_CONFIG")]
        config: Option<PathBuf>,
    },
}

/// Arguments for the play command.
#[derive(Parser, Debug, Clone)]
pub struct PlayArgs {
    /// Strategy configuration file (JSON) shared by both negotiators.
    #[arg(short, long, env = "PARLEY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of steps before the negotiation times out.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub steps: u32,

    /// Number of issues in the synthetic space.
    #[arg(short, long, default_value_t = 3)]
    pub issues: usize,

    /// Number of values per issue.
    #[arg(short, long, default_value_t = 10)]
    pub values: u32,

    /// Seed for the synthetic preferences and outcome sampling.
    #[arg(short, long, default_value_t = 42)]
    pub seed: u64,

    /// Reserved value of the first negotiator.
    #[arg(long, default_value_t = 0.3)]
    pub reserved_a: f64,

    /// Reserved value of the second negotiator.
    #[arg(long, default_value_t = 0.3)]
    pub reserved_b: f64,

    /// Override the minimum offers before classification.
    #[arg(long)]
    pub min_offers: Option<usize>,

    /// Override the outcome enumeration/sampling cap.
    #[arg(long)]
    pub max_outcomes: Option<usize>,

    /// Include every offer exchanged in the report.
    #[arg(long)]
    pub trace: bool,
}
