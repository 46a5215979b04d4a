//! Error types for dataset validation.

use nsfg_ingest::IngestError;
use thiserror::Error;

/// Errors that abort a validation run.
///
/// A pregnancy-count mismatch is not an error: the validator reports it as
/// [`PregnumCheck::Mismatch`](crate::PregnumCheck::Mismatch).
#[derive(Debug, Error)]
pub enum ValidateError {
    /// Required column not present in the table.
    #[error("column '{column}' not found")]
    MissingColumn { column: String },

    /// Required value is null or blank.
    #[error("row {row}: '{column}' is missing")]
    MissingValue { column: String, row: usize },

    /// Value present but not usable as the expected type.
    #[error("row {row}: '{column}' value '{value}' is not a whole number")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    /// Respondent case id has no rows in the pregnancy table.
    #[error("row {row}: caseid {caseid} not found in pregnancy index")]
    UnknownCase { caseid: String, row: usize },

    #[error("expected {expected} rows, found {actual}")]
    RowCount { expected: usize, actual: usize },

    #[error("expected {expected} rows with {column} == {value}, found {actual}")]
    ValueFrequency {
        column: String,
        value: i64,
        expected: usize,
        actual: usize,
    },

    /// Loading the related table failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for ValidateError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidateError>;
