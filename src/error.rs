//! Error types for the revenue dashboard library.

use std::io;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, exporting or downloading data.
///
/// The pure pipeline stages (formatting, transforming, aggregating and
/// filtering) never fail; only the I/O-bound edges return these.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred during read or write operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error writing CSV output.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error reading or writing JSON documents.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid date format.
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Unknown relative period name.
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Unknown transaction type.
    #[error("Invalid transaction type: {0}")]
    InvalidType(String),

    /// Unknown transaction status.
    #[error("Invalid transaction status: {0}")]
    InvalidStatus(String),

    /// Generated output was not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(#[from] FromUtf8Error),

    /// The host environment refused part of the download protocol.
    #[error("Download error: {0}")]
    Download(String),
}
