//! Transcript error types

use thiserror::Error;

/// Transcript-related errors
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// File not found
    #[error("Transcript file not found: {0}")]
    FileNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
