//! Command implementations.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use parley_agent::StrategyConfig;

use crate::cli::PlayArgs;
use crate::error::CliError;
use crate::output::{ConfigView, OutputFormat};
use crate::selfplay::Matchup;

/// Loads a strategy configuration file, or the defaults without one.
pub fn load_config(path: Option<&Path>) -> Result<StrategyConfig, CliError> {
    let Some(path) = path else {
        return Ok(StrategyConfig::default());
    };
    debug!(path = %path.display(), "loading strategy configuration");
    let json = fs::read_to_string(path)?;
    Ok(StrategyConfig::from_json_str(&json)?)
}

/// Builds the matchup described by `args`, applying flag overrides on top of
/// the loaded configuration.
pub fn matchup(args: &PlayArgs) -> Result<Matchup, CliError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(min_offers) = args.min_offers {
        config.min_offers = min_offers;
    }
    if let Some(max_outcomes) = args.max_outcomes {
        config.max_outcomes = max_outcomes;
    }
    config.validate()?;
    Ok(Matchup {
        config,
        steps: args.steps,
        issues: args.issues,
        values: args.values,
        seed: args.seed,
        reserved: [args.reserved_a, args.reserved_b],
        trace: args.trace,
    })
}

/// Runs a self-play negotiation and writes its report.
pub fn play<W: Write>(writer: &mut W, format: &OutputFormat, args: &PlayArgs) -> Result<(), CliError> {
    let report = matchup(args)?.run()?;
    format.write(writer, &report)
}

/// Writes the effective strategy configuration.
pub fn show_config<W: Write>(
    writer: &mut W,
    format: &OutputFormat,
    path: Option<&Path>,
) -> Result<(), CliError> {
    let config = load_config(path)?;
    format.write(writer, &ConfigView(config))
}
