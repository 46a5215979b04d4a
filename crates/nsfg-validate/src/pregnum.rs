//! Respondent `pregnum` against pregnancy-table record counts.
//!
//! Every respondent reports how many pregnancies they have had. The
//! pregnancy file should hold exactly that many rows for the respondent's
//! case id. The scan stops at the first respondent (in table order) whose
//! claim disagrees; later rows are never looked up.

use std::fmt;

use polars::prelude::{AnyValue, DataFrame};
use serde::Serialize;
use tracing::{info, info_span, warn};

use nsfg_ingest::{PregnancySource, any_to_i64, any_to_string, find_column};
use nsfg_model::MissingCasePolicy;

use crate::error::{Result, ValidateError};
use crate::index::{CASEID, CaseLookup, build_pregnancy_index, case_key};

/// Respondent column holding the self-reported pregnancy count.
pub const PREGNUM: &str = "pregnum";

/// First respondent whose `pregnum` disagrees with the pregnancy table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PregnumMismatch {
    /// Respondent row position.
    pub row: usize,
    pub caseid: String,
    /// Pregnancy rows found for the case.
    pub actual: usize,
    /// The respondent's `pregnum`.
    pub claimed: i64,
}

impl fmt::Display for PregnumMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "caseid {} has {} pregnancy records but pregnum is {}",
            self.caseid, self.actual, self.claimed
        )
    }
}

/// Outcome of the cross-table check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PregnumCheck {
    /// Every respondent's claim matched.
    Consistent { rows_checked: usize },
    /// The scan stopped at this respondent.
    Mismatch(PregnumMismatch),
}

impl PregnumCheck {
    pub fn is_consistent(&self) -> bool {
        matches!(self, Self::Consistent { .. })
    }

    pub fn mismatch(&self) -> Option<&PregnumMismatch> {
        match self {
            Self::Mismatch(mismatch) => Some(mismatch),
            Self::Consistent { .. } => None,
        }
    }
}

/// Load the pregnancy table from `source`, index it, and check every
/// respondent against the index.
pub fn validate_pregnum_consistency<S>(
    respondents: &DataFrame,
    source: &S,
    policy: MissingCasePolicy,
) -> Result<PregnumCheck>
where
    S: PregnancySource + ?Sized,
{
    let pregnancies = source.load_pregnancies()?;
    let index = build_pregnancy_index(&pregnancies)?;
    check_pregnum(respondents, &index, policy)
}

/// Compare each respondent's `pregnum` to the number of pregnancy rows
/// `lookup` reports for its case id, stopping at the first disagreement.
pub fn check_pregnum<L>(
    respondents: &DataFrame,
    lookup: &L,
    policy: MissingCasePolicy,
) -> Result<PregnumCheck>
where
    L: CaseLookup + ?Sized,
{
    let span = info_span!("pregnum_check", rows = respondents.height(), ?policy);
    let _guard = span.enter();

    let missing = |column: &str| ValidateError::MissingColumn {
        column: column.to_string(),
    };
    let caseids = find_column(respondents, CASEID).ok_or_else(|| missing(CASEID))?;
    let pregnums = find_column(respondents, PREGNUM).ok_or_else(|| missing(PREGNUM))?;

    for row in 0..respondents.height() {
        let caseid = case_key(caseids.get(row).unwrap_or(AnyValue::Null)).ok_or_else(|| {
            ValidateError::MissingValue {
                column: CASEID.to_string(),
                row,
            }
        })?;
        let claimed = claimed_count(pregnums.get(row).unwrap_or(AnyValue::Null), row)?;

        let actual = match (lookup.pregnancy_count(&caseid), policy) {
            (Some(count), _) => count,
            (None, MissingCasePolicy::TreatAsZero) => 0,
            (None, MissingCasePolicy::Fail) => {
                return Err(ValidateError::UnknownCase { caseid, row });
            }
        };

        if i64::try_from(actual).ok() != Some(claimed) {
            let mismatch = PregnumMismatch {
                row,
                caseid,
                actual,
                claimed,
            };
            warn!(
                caseid = %mismatch.caseid,
                actual = mismatch.actual,
                claimed = mismatch.claimed,
                row,
                "pregnum does not match pregnancy records"
            );
            return Ok(PregnumCheck::Mismatch(mismatch));
        }
    }

    info!(rows_checked = respondents.height(), "pregnum consistent");
    Ok(PregnumCheck::Consistent {
        rows_checked: respondents.height(),
    })
}

fn claimed_count(value: AnyValue<'_>, row: usize) -> Result<i64> {
    if matches!(value, AnyValue::Null) {
        return Err(ValidateError::MissingValue {
            column: PREGNUM.to_string(),
            row,
        });
    }
    let text = any_to_string(value.clone());
    any_to_i64(value).ok_or_else(|| {
        if text.trim().is_empty() {
            ValidateError::MissingValue {
                column: PREGNUM.to_string(),
                row,
            }
        } else {
            ValidateError::InvalidValue {
                column: PREGNUM.to_string(),
                row,
                value: text,
            }
        }
    })
}
