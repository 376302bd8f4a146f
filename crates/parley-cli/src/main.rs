//! Parley CLI binary entrypoint.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use parley_cli::cli::{Cli, Commands};
use parley_cli::commands;
use parley_cli::output::OutputFormat;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Play(args) => {
            commands::play(&mut stdout, &format, &args).context("self-play failed")?;
        }
        Commands::Config { config } => {
            commands::show_config(&mut stdout, &format, config.as_deref())
                .context("cannot load strategy configuration")?;
        }
    }
    Ok(())
}
