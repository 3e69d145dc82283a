//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while parsing trace lines
///
/// These are recoverable: the trace pass logs them and skips the line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Malformed trace line: {0}")]
    MalformedTrace(String),

    #[error("Tree invariant violated: {0}")]
    InvariantViolation(String),
}

/// Errors that can occur while averaging event logs across runs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelationError {
    #[error("No event logs supplied")]
    NoRuns,

    #[error("Script {id} is present in run 0 but missing from run {run}")]
    MissingCorrelationData { id: u64, run: usize },
}

/// Errors that can occur during aggregation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("Unrecognized namespace for script: {0}")]
    UnrecognizedNamespace(String),
}

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
