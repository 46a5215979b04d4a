//! Error types for NSFG data ingestion.

use std::path::PathBuf;

use nsfg_model::{ColumnKind, ModelError};
use thiserror::Error;

/// Errors that can occur while reading dictionaries and fixed-width data.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Failed to open or read a file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Dictionary Errors ===
    /// A `_column(N)` line could not be parsed.
    #[error("malformed dictionary line {line} in {path}: {reason}")]
    DictionarySyntax {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Storage type is not one Stata defines.
    #[error("unknown storage type '{storage}' for column '{column}' in {path}")]
    UnknownStorageType {
        path: PathBuf,
        column: String,
        storage: String,
    },

    /// The parsed columns do not form a valid layout.
    #[error("invalid column layout in {path}: {source}")]
    Layout {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    // === Decoding Errors ===
    /// A field could not be converted to its declared type.
    #[error("cannot decode {kind} column '{column}' from '{value}' at {path}:{line}")]
    FieldDecode {
        path: PathBuf,
        line: usize,
        column: String,
        value: String,
        kind: ColumnKind,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
