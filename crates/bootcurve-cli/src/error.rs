//! CLI error types.

use std::path::PathBuf;

use bootcurve_curves::CurveError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// Missing required argument.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// CSV feed could not be parsed.
    #[error("Invalid CSV in {path}: {source}")]
    Csv {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: csv::Error,
    },

    /// TOML run file could not be parsed.
    #[error("Invalid run file {path}: {source}")]
    Toml {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },

    /// Curve construction error.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// The bootstrap stopped at an instrument.
    #[error("Bootstrap failed at instrument #{index} ({tenor}): {reason}")]
    BootstrapFailed {
        /// Failing instrument index.
        index: usize,
        /// Its tenor.
        tenor: String,
        /// Solver message.
        reason: String,
    },
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
