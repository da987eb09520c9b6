//! Storage-specific error types for SQLite operations.
//!
//! This module provides error types that wrap rusqlite and filesystem errors
//! and convert them to the driver-agnostic error types defined in
//! `fundread_core`.

use fundread_core::errors::{Error, QueryError};
use thiserror::Error;

/// Storage-specific errors that wrap rusqlite and I/O types.
///
/// These errors are internal to the storage layer and are converted to
/// `fundread_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(rusqlite::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    #[error("Decompression failed: {0}")]
    Decompression(String),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(e) => {
                Error::Query(QueryError::ConnectionFailed(driver_message(&e)))
            }
            StorageError::QueryFailed(e) => Error::Query(QueryError::Failed(driver_message(&e))),
            StorageError::Decompression(e) => Error::Decompression(e),
        }
    }
}

/// The message SQLite attached to a failure, falling back to the error text.
fn driver_message(err: &rusqlite::Error) -> String {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(msg)) => msg.clone(),
        other => other.to_string(),
    }
}

/// Extension trait for easily converting rusqlite Results to core Results.
///
/// This provides a `.into_core()` method on any `Result<T, rusqlite::Error>`
/// which handles the conversion through StorageError.
pub trait IntoCore<T> {
    fn into_core(self) -> fundread_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, rusqlite::Error> {
    fn into_core(self) -> fundread_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}
