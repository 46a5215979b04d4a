//! Dataset-level shape checks.

use polars::prelude::{AnyValue, DataFrame};
use tracing::debug;

use nsfg_ingest::{any_to_i64, find_column};

use crate::error::{Result, ValidateError};

/// Fail unless the table has exactly `expected` rows.
pub fn expect_row_count(df: &DataFrame, expected: usize) -> Result<()> {
    let actual = df.height();
    debug!(expected, actual, "row count");
    if actual == expected {
        Ok(())
    } else {
        Err(ValidateError::RowCount { expected, actual })
    }
}

/// Number of rows whose `column` holds the whole number `value`. Nulls never match.
pub fn value_frequency(df: &DataFrame, column: &str, value: i64) -> Result<usize> {
    let series = find_column(df, column).ok_or_else(|| ValidateError::MissingColumn {
        column: column.to_string(),
    })?;
    let count = (0..series.len())
        .filter(|idx| any_to_i64(series.get(*idx).unwrap_or(AnyValue::Null)) == Some(value))
        .count();
    Ok(count)
}

/// Fail unless exactly `expected` rows have `column == value`.
pub fn expect_value_frequency(
    df: &DataFrame,
    column: &str,
    value: i64,
    expected: usize,
) -> Result<()> {
    let actual = value_frequency(df, column, value)?;
    debug!(column, value, expected, actual, "value frequency");
    if actual == expected {
        Ok(())
    } else {
        Err(ValidateError::ValueFrequency {
            column: column.to_string(),
            value,
            expected,
            actual,
        })
    }
}
