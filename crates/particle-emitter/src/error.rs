use std::io;
use thiserror::Error;

/// Error types for emitter configuration and scheduling
#[derive(Error, Debug)]
pub enum EmitterError {
    /// I/O Error while reading a descriptor
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A change that needs a buffer rebuild was requested while the emitter runs
    #[error("Cannot change {what} while the emitter is running; pause it first")]
    RebuildWhileRunning { what: String },

    /// The configuration spawns relative to a source entity but none was supplied
    #[error("Missing source transform: {0}")]
    MissingSource(String),

    /// The configuration spawns across a model surface but no vertices were supplied
    #[error("Missing model surface: {0}")]
    MissingModel(String),

    /// Error while parsing a descriptor value
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type using EmitterError
pub type Result<T> = std::result::Result<T, EmitterError>;
