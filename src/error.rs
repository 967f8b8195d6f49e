// src/error.rs
// =============================================================================
// Fatal error types for the checker core.
//
// Only these two variants ever cross the process boundary:
// - Config: invalid or missing input, raised before any network activity
// - Log: the result log could not be opened or written
//
// Per-URL transport failures are NOT errors here - they are captured as data
// in a ProbeResult and surface only through the log file.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    /// Invalid or missing configuration; aborts before any request is issued.
    #[error("configuration error: {0}")]
    Config(String),

    /// The result log could not be opened or appended to; aborts the run.
    #[error("cannot write log file {}: {source}", .path.display())]
    Log {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CheckError {
    /// Shorthand for a configuration failure with a formatted message.
    pub fn config(message: impl Into<String>) -> Self {
        CheckError::Config(message.into())
    }
}
