//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use gsvpd::config::ConfigFileError;
use gsvpd::coord::CoordError;
use gsvpd::pipeline::BatchError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be loaded
    Config(ConfigFileError),
    /// Configuration file named on the command line does not exist
    ConfigNotFound(String),
    /// Zoom level out of range
    Zoom(CoordError),
    /// Dataset could not be read or parsed
    Dataset { path: String, reason: String },
    /// Async runtime could not be started
    Runtime(std::io::Error),
    /// The batch could not start
    Batch(BatchError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Dataset { .. } => {
                eprintln!();
                eprintln!("The dataset must be a JSON array of panorama ids, e.g.:");
                eprintln!("  [\"CAoSLEFGMVFpcE...\", \"AF1QipN...\"]");
            }
            CliError::Batch(BatchError::WorkerPool(_)) => {
                eprintln!();
                eprintln!("Try a smaller --workers value.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::ConfigNotFound(path) => write!(f, "Config file not found: {}", path),
            CliError::Zoom(e) => write!(f, "{}", e),
            CliError::Dataset { path, reason } => {
                write!(f, "Failed to load dataset '{}': {}", path, reason)
            }
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Batch(e) => write!(f, "Batch failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Zoom(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Batch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Zoom(e)
    }
}

impl From<BatchError> for CliError {
    fn from(e: BatchError) -> Self {
        CliError::Batch(e)
    }
}
