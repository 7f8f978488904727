//! Common error types for ttgen

use std::time::Duration;
use thiserror::Error;

/// Common result type for ttgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds surfaced by classification, uploads and configuration
///
/// Every variant renders as a single human-readable reason; no structured
/// error codes cross the UI boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// A file in a bulk (or course) upload does not carry the `.csv` suffix
    #[error("{0}")]
    InvalidFileType(String),

    /// File name matched none of the upload categories
    #[error("Unknown file type: {0}")]
    UnrecognizedFileName(String),

    /// Semester label without a numeric component
    #[error("Invalid semester label: {0:?} has no semester number")]
    InvalidSemesterLabel(String),

    /// Backend answered `success: false` or a body that was not JSON
    #[error("{0}")]
    UploadRejected(String),

    /// Transport-level failure (connect, TLS, read)
    #[error("Network error: {0}")]
    Network(String),

    /// Saving duration settings before generation failed
    #[error("Failed to save configuration: {0}")]
    ConfigSave(String),

    /// Batch did not settle within the configured deadline
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Batch was cancelled through its cancellation token
    #[error("Operation cancelled")]
    Cancelled,

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        assert_eq!(
            Error::UnrecognizedFileName("notes.csv".to_string()).to_string(),
            "Unknown file type: notes.csv"
        );
        assert_eq!(
            Error::UploadRejected("Invalid batch file format".to_string()).to_string(),
            "Invalid batch file format"
        );
        assert_eq!(
            Error::Timeout(Duration::from_secs(30)).to_string(),
            "Timed out after 30s"
        );
    }
}
