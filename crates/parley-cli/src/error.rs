//! CLI error types.

use parley_agent::{AgentError, ConfigError};
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid strategy configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The synthetic outcome space could not be built.
    #[error("agent error: {0}")]
    Agent(#[from] AgentError),
    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_argument() {
        let err = CliError::InvalidArgument("issues must be positive".into());
        assert_eq!(err.to_string(), "invalid argument: issues must be positive");
    }

    #[test]
    fn wraps_config_error() {
        let err: CliError = ConfigError::Parse("expected value".into()).into();
        assert!(err.to_string().starts_with("configuration error:"));
    }

    #[test]
    fn io_error_has_source() {
        use std::error::Error as _;
        let err: CliError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(err.source().is_some());
    }
}
