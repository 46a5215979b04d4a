//! Case id to pregnancy-row index.

use std::collections::BTreeMap;
use std::time::Instant;

use polars::prelude::{AnyValue, DataFrame};
use tracing::{debug, info};

use nsfg_ingest::{any_to_string_non_empty, find_column};

use crate::error::{Result, ValidateError};

/// Join key column shared by the respondent and pregnancy tables.
pub const CASEID: &str = "caseid";

/// Canonical text form of a case id cell. Blank and null cells have none.
///
/// Integer and text cells holding the same digits produce the same key, so
/// tables whose dictionaries disagree on the caseid storage type still join.
pub fn case_key(value: AnyValue<'_>) -> Option<String> {
    any_to_string_non_empty(value)
}

/// Number of pregnancy rows recorded for a case.
pub trait CaseLookup {
    /// `None` when the case has no pregnancy rows at all.
    fn pregnancy_count(&self, caseid: &str) -> Option<usize>;
}

/// Row positions of every pregnancy, grouped by case id in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PregnancyIndex {
    positions: BTreeMap<String, Vec<usize>>,
    skipped_rows: usize,
}

impl PregnancyIndex {
    /// Row positions for `caseid`, in ascending order.
    pub fn positions(&self, caseid: &str) -> Option<&[usize]> {
        self.positions.get(caseid).map(Vec::as_slice)
    }

    /// Number of distinct cases.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, caseid: &str) -> bool {
        self.positions.contains_key(caseid)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.positions
            .iter()
            .map(|(caseid, rows)| (caseid.as_str(), rows.as_slice()))
    }

    /// Rows left out because their case id was blank.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Rows that were indexed.
    pub fn indexed_rows(&self) -> usize {
        self.positions.values().map(Vec::len).sum()
    }
}

impl CaseLookup for PregnancyIndex {
    fn pregnancy_count(&self, caseid: &str) -> Option<usize> {
        self.positions.get(caseid).map(Vec::len)
    }
}

/// Build the index in a single pass over the pregnancy table.
pub fn build_pregnancy_index(pregnancies: &DataFrame) -> Result<PregnancyIndex> {
    let start = Instant::now();
    let caseids = find_column(pregnancies, CASEID).ok_or_else(|| ValidateError::MissingColumn {
        column: CASEID.to_string(),
    })?;

    let mut index = PregnancyIndex::default();
    for row in 0..pregnancies.height() {
        match case_key(caseids.get(row).unwrap_or(AnyValue::Null)) {
            Some(caseid) => index.positions.entry(caseid).or_default().push(row),
            None => index.skipped_rows += 1,
        }
    }

    if index.skipped_rows > 0 {
        debug!(skipped = index.skipped_rows, "pregnancy rows without caseid");
    }
    info!(
        cases = index.len(),
        rows = pregnancies.height(),
        duration_ms = start.elapsed().as_millis(),
        "pregnancy index built"
    );
    Ok(index)
}
