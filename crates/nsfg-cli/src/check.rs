//! The respondent/pregnancy consistency run.
//!
//! Steps run in order and the first failure ends the run:
//!
//! 1. load the respondent table
//! 2. row count
//! 3. frequency of `pregnum == 1`
//! 4. `pregnum` against the pregnancy table

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, info_span};

use nsfg_ingest::{PregnancyLoader, load_respondents};
use nsfg_model::{CheckOptions, DatasetSource};
use nsfg_validate::{
    PREGNUM, PregnumCheck, expect_row_count, expect_value_frequency, validate_pregnum_consistency,
    value_frequency,
};

/// Everything a check run needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckPlan {
    pub respondents: DatasetSource,
    pub pregnancies: DatasetSource,
    pub options: CheckOptions,
}

impl Default for CheckPlan {
    fn default() -> Self {
        Self {
            respondents: DatasetSource::respondents(),
            pregnancies: DatasetSource::pregnancies(),
            options: CheckOptions::default(),
        }
    }
}

impl CheckPlan {
    /// Resolve both datasets' relative paths against `dir`.
    #[must_use]
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.respondents = self.respondents.with_data_dir(dir);
        self.pregnancies = self.pregnancies.with_data_dir(dir);
        self
    }

    /// Cap the respondent table at `max_rows` decoded rows. The pregnancy
    /// table is always read in full.
    #[must_use]
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.respondents = self.respondents.with_max_rows(max_rows);
        self
    }
}

/// One passed step of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckStep {
    pub name: &'static str,
    pub expected: String,
    pub actual: String,
}

impl CheckStep {
    fn new(name: &'static str, expected: impl ToString, actual: impl ToString) -> Self {
        Self {
            name,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Outcome of a run where every step passed.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub respondent_rows: usize,
    pub respondent_columns: usize,
    pub steps: Vec<CheckStep>,
    pub duration_ms: u128,
}

/// Run every step of `plan`. Any failed step is returned as an error
/// describing what was expected and what was found.
pub fn run_check(plan: &CheckPlan) -> Result<CheckReport> {
    let span = info_span!("check", respondents = %plan.respondents.data.display());
    let _guard = span.enter();
    let start = Instant::now();
    let options = &plan.options;
    let mut steps = Vec::new();

    let respondents = load_respondents(&plan.respondents).with_context(|| {
        format!(
            "load respondents from {}",
            plan.respondents.data.display()
        )
    })?;
    steps.push(CheckStep::new(
        "load respondents",
        "-",
        format!("{} x {}", respondents.height(), respondents.width()),
    ));

    expect_row_count(&respondents, options.expected_rows).context("respondent row count")?;
    steps.push(CheckStep::new(
        "respondent rows",
        options.expected_rows,
        respondents.height(),
    ));

    let pregnum_one = value_frequency(&respondents, PREGNUM, 1).context("pregnum frequency")?;
    expect_value_frequency(&respondents, PREGNUM, 1, options.expected_pregnum_one)
        .context("pregnum frequency")?;
    steps.push(CheckStep::new(
        "pregnum == 1",
        options.expected_pregnum_one,
        pregnum_one,
    ));

    let loader = PregnancyLoader::new(plan.pregnancies.clone());
    let check = validate_pregnum_consistency(&respondents, &loader, options.missing_case)
        .with_context(|| {
            format!(
                "check pregnum against {}",
                plan.pregnancies.data.display()
            )
        })?;
    match check {
        PregnumCheck::Consistent { rows_checked } => {
            steps.push(CheckStep::new(
                "pregnum matches pregnancies",
                respondents.height(),
                rows_checked,
            ));
        }
        PregnumCheck::Mismatch(mismatch) => {
            bail!(
                "pregnum mismatch at respondent row {}: {mismatch}",
                mismatch.row
            );
        }
    }

    let duration_ms = start.elapsed().as_millis();
    info!(steps = steps.len(), duration_ms, "all checks passed");
    Ok(CheckReport {
        respondent_rows: respondents.height(),
        respondent_columns: respondents.width(),
        steps,
        duration_ms,
    })
}
