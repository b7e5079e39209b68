//! Error taxonomy for bootstrap and query operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while bootstrapping the store or running reports.
///
/// Out-of-domain filter *values* (an unknown genre, an hour outside 0-23)
/// are not errors: those queries return an empty result. Only malformed
/// identifiers, malformed source rows, and store failures surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// A required CSV source is missing at load time. Fatal.
    #[error("source for table '{table}' not found: {path:?}")]
    SourceNotFound { table: &'static str, path: PathBuf },

    /// A row failed date/time normalization or a required-column check.
    /// The whole load aborts on the first malformed row.
    #[error("malformed row in '{table}' at line {line}: {reason}")]
    MalformedRow {
        table: &'static str,
        line: u64,
        reason: String,
    },

    /// Schema creation ran against a store that already has base tables.
    #[error("schema error: {0}")]
    Schema(String),

    /// A view definition references a base table that does not exist.
    #[error("view '{view}' references missing base table '{missing}'")]
    ViewDefinition {
        view: &'static str,
        missing: &'static str,
    },

    /// A filter or order column is not part of the queried view.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
