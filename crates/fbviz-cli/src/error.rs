//! Command-line error types using thiserror.

use fbviz_common::FbvizError;
use fbviz_config::ConfigError;

/// Error returned by every subcommand.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A pipeline step failed.
    #[error(transparent)]
    Pipeline(#[from] FbvizError),

    /// The tracing subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// Arguments are valid syntax but do not make sense together.
    #[error("Invalid arguments: {0}")]
    Usage(String),
}

/// Result type for the command line.
pub type CliResult<T> = Result<T, CliError>;
