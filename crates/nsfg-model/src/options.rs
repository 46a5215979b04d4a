//! Configuration for loading datasets and running the consistency checks.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default Stata dictionary for the 2002 female respondent file.
pub const DEFAULT_RESPONDENT_DCT: &str = "2002FemResp.dct";
/// Default gzip-compressed fixed-width respondent data file.
pub const DEFAULT_RESPONDENT_DAT: &str = "2002FemResp.dat.gz";
/// Default Stata dictionary for the 2002 female pregnancy file.
pub const DEFAULT_PREGNANCY_DCT: &str = "2002FemPreg.dct";
/// Default gzip-compressed fixed-width pregnancy data file.
pub const DEFAULT_PREGNANCY_DAT: &str = "2002FemPreg.dat.gz";

/// Number of respondents in the 2002 cycle.
pub const DEFAULT_EXPECTED_ROWS: usize = 7643;
/// Respondents in the 2002 cycle reporting exactly one pregnancy.
pub const DEFAULT_EXPECTED_PREGNUM_ONE: usize = 1267;

/// Where a fixed-width table and its dictionary live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSource {
    /// Stata dictionary describing the column layout.
    pub dictionary: PathBuf,
    /// Fixed-width data file, optionally gzip-compressed.
    pub data: PathBuf,
    /// Stop decoding after this many rows.
    pub max_rows: Option<usize>,
}

impl DatasetSource {
    pub fn new(dictionary: impl Into<PathBuf>, data: impl Into<PathBuf>) -> Self {
        Self {
            dictionary: dictionary.into(),
            data: data.into(),
            max_rows: None,
        }
    }

    /// The NSFG 2002 respondent file, relative to the working directory.
    pub fn respondents() -> Self {
        Self::new(DEFAULT_RESPONDENT_DCT, DEFAULT_RESPONDENT_DAT)
    }

    /// The NSFG 2002 pregnancy file, relative to the working directory.
    pub fn pregnancies() -> Self {
        Self::new(DEFAULT_PREGNANCY_DCT, DEFAULT_PREGNANCY_DAT)
    }

    #[must_use]
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Resolve relative paths against `dir`. Absolute paths are kept.
    #[must_use]
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.dictionary = rebase(dir, self.dictionary);
        self.data = rebase(dir, self.data);
        self
    }
}

fn rebase(dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        dir.join(path)
    }
}

/// What to do when a respondent's case id has no pregnancy rows at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingCasePolicy {
    /// Abort the check with an unknown-case error.
    #[default]
    Fail,
    /// Count the case as having zero pregnancy rows.
    TreatAsZero,
}

/// Expected dataset shape and cross-check behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOptions {
    /// Expected number of respondent rows.
    pub expected_rows: usize,
    /// Expected number of respondents with `pregnum == 1`.
    pub expected_pregnum_one: usize,
    /// Policy for case ids absent from the pregnancy table.
    pub missing_case: MissingCasePolicy,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            expected_rows: DEFAULT_EXPECTED_ROWS,
            expected_pregnum_one: DEFAULT_EXPECTED_PREGNUM_ONE,
            missing_case: MissingCasePolicy::default(),
        }
    }
}
