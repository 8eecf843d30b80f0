//! Error types for the Credo engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup, the run, and output.

use std::path::PathBuf;

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: credo_core::ConfigError,
    },

    /// The scenario could not be turned into a population.
    #[error("population error: {source}")]
    Population {
        /// The underlying population error.
        #[from]
        source: credo_core::PopulationError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: credo_core::RunnerError,
    },

    /// Report or snapshot rendering failed.
    #[error("report error: {source}")]
    Report {
        /// The underlying report error.
        #[from]
        source: credo_core::ReportError,
    },

    /// Writing an output file failed.
    #[error("failed to write {}: {source}", path.display())]
    Output {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The tracing subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
