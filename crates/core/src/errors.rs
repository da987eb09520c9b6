//! Core error types for the fund record store reader.
//!
//! This module defines driver-agnostic error types. Storage-specific errors
//! (from SQLite, gzip, the filesystem) are converted to these types by the
//! storage layer.

use chrono::ParseError as ChronoParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the reader.
#[derive(Error, Debug)]
pub enum Error {
    /// No backing artifact could be resolved.
    #[error("Fund store not found: {0}")]
    NotFound(String),

    #[error("Query failed: {0}")]
    Query(#[from] QueryError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    /// The compressed artifact is corrupt, truncated, or could not be
    /// expanded into a scratch file.
    #[error("Decompression failed: {0}")]
    Decompression(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration value: {0}")]
    Config(String),
}

/// Errors raised while building or running a query.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Table '{0}' does not exist")]
    UnknownTable(String),

    #[error("Column '{column}' does not exist in table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// The statement would modify the store.
    #[error("Statement is not read-only: {0}")]
    NotReadOnly(String),

    #[error("Only one statement may be run at a time: {0}")]
    MultipleStatements(String),

    #[error("Failed to open database connection: {0}")]
    ConnectionFailed(String),

    /// The driver rejected or failed the statement. Carries the driver message.
    #[error("{0}")]
    Failed(String),
}

/// Errors raised while writing an export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot write to '{}': {reason}", path.display())]
    Unwritable { path: PathBuf, reason: String },

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

impl Error {
    /// Returns true for errors produced by a single query, as opposed to
    /// errors about the store itself.
    pub fn is_query(&self) -> bool {
        matches!(self, Error::Query(_))
    }
}
