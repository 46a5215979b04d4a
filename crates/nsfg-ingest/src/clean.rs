//! Row-level cleaning passes applied after decoding.
//!
//! A [`TableCleaner`] runs once over a freshly decoded table, before any
//! consumer sees it. Cleaners only touch columns that exist, so they also
//! work on trimmed-down layouts.

use polars::prelude::{AnyValue, Column, DataFrame};
use tracing::debug;

use crate::error::Result;
use crate::polars_utils::{any_to_f64, find_column};

/// Mutates a decoded table in place.
pub trait TableCleaner {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn clean(&self, df: &mut DataFrame) -> Result<()>;
}

/// Respondent cleaning. Currently changes nothing; sentinel recodes for the
/// respondent file belong here.
#[derive(Debug, Clone, Copy, Default)]
pub struct RespondentCleaner;

impl TableCleaner for RespondentCleaner {
    fn name(&self) -> &'static str {
        "respondent"
    }

    fn clean(&self, _df: &mut DataFrame) -> Result<()> {
        Ok(())
    }
}

/// Pregnancy-file recodes: NSFG "not ascertained", "refused" and
/// "don't know" codes become missing, and derived weight columns are added.
#[derive(Debug, Clone, Copy, Default)]
pub struct PregnancyCleaner;

/// Birth weight in pounds above this is a recode, not a weight.
const MAX_BIRTHWGT_LB: f64 = 20.0;
const NA_CODES: &[f64] = &[97.0, 98.0, 99.0];

impl TableCleaner for PregnancyCleaner {
    fn name(&self) -> &'static str {
        "pregnancy"
    }

    fn clean(&self, df: &mut DataFrame) -> Result<()> {
        // Mother's age at end of pregnancy is stored in centiyears.
        map_float_column(df, "agepreg", |v| v.map(|age| age / 100.0))?;
        map_float_column(df, "birthwgt_lb", |v| {
            v.filter(|lb| *lb <= MAX_BIRTHWGT_LB && !NA_CODES.contains(lb))
        })?;
        map_float_column(df, "birthwgt_oz", |v| v.filter(|oz| !NA_CODES.contains(oz)))?;
        map_float_column(df, "hpagelb", |v| v.filter(|age| !NA_CODES.contains(age)))?;
        map_float_column(df, "babysex", |v| v.filter(|sex| *sex != 7.0 && *sex != 9.0))?;
        map_float_column(df, "nbrnaliv", |v| v.filter(|n| *n != 9.0))?;
        add_total_weight(df)?;
        map_float_column(df, "cmintvw", |_| None)?;
        Ok(())
    }
}

fn float_values(column: &Column) -> Vec<Option<f64>> {
    (0..column.len())
        .map(|idx| any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

/// Replace `name` with a `Float64` column produced by `f`. Returns false when
/// the column does not exist.
fn map_float_column<F>(df: &mut DataFrame, name: &str, f: F) -> Result<bool>
where
    F: Fn(Option<f64>) -> Option<f64>,
{
    let Some(column) = find_column(df, name) else {
        return Ok(false);
    };
    let resolved = column.name().to_string();
    let before = column.null_count();
    let values: Vec<Option<f64>> = float_values(column).into_iter().map(f).collect();
    let after = values.iter().filter(|v| v.is_none()).count();

    df.with_column(Column::new(resolved.as_str().into(), values))?;
    debug!(
        column = %resolved,
        nulled = after.saturating_sub(before),
        "cleaned column"
    );
    Ok(true)
}

/// `totalwgt_lb = birthwgt_lb + birthwgt_oz / 16`.
fn add_total_weight(df: &mut DataFrame) -> Result<()> {
    let (Some(lb), Some(oz)) = (find_column(df, "birthwgt_lb"), find_column(df, "birthwgt_oz"))
    else {
        return Ok(());
    };
    let total: Vec<Option<f64>> = float_values(lb)
        .into_iter()
        .zip(float_values(oz))
        .map(|(lb, oz)| Some(lb? + oz? / 16.0))
        .collect();
    df.with_column(Column::new("totalwgt_lb".into(), total))?;
    debug!(column = "totalwgt_lb", "derived column");
    Ok(())
}
