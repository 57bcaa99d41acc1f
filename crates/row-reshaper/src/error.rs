//! Error types for row reshaping.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading and reshaping rows.
#[derive(Error, Debug)]
pub enum ReshapeError {
    #[error("Failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column '{column}' not found in CSV headers: {headers:?}")]
    MissingColumn { column: String, headers: Vec<String> },

    #[error(
        "Row {row}: body is not valid JSON (Python literals such as 'key', True or None are not supported): {source}"
    )]
    InvalidJson {
        row: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Row {row}: body must be a JSON object, found {found}")]
    NotAnObject { row: usize, found: &'static str },
}
