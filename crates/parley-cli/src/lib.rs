//! # parley-cli
//!
//! Command-line runner for the parley negotiation agent.
//!
//! Provides commands for:
//! - Self-play between two negotiators over a synthetic issue space
//! - Inspecting the effective strategy configuration

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod selfplay;

pub use cli::{Cli, Commands, Format, PlayArgs};
pub use error::CliError;
pub use output::OutputFormat;
pub use selfplay::{Matchup, PlayReport, PlayStatus};
