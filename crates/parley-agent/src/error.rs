//! Error types for parley-agent.

use thiserror::Error;

/// Errors raised while building or loading a [`StrategyConfig`](crate::config::StrategyConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A numeric parameter is outside its allowed range.
    #[error("invalid {field}: {value} (expected {expected})")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable description of the allowed range.
        expected: &'static str,
    },

    /// Two parameters are inconsistent with each other.
    #[error("inconsistent configuration: {0}")]
    Inconsistent(String),

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// Errors that can occur in agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Configuration rejected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Outcome space could not produce outcomes.
    #[error("outcome space error: {0}")]
    OutcomeSpace(String),
}
