//! Data model for the NSFG fixed-width survey files.
//!
//! - [`dictionary`]: column layouts used to slice fixed-width records
//! - [`options`]: dataset locations and check expectations
//! - [`lookup`]: case-insensitive column name resolution

pub mod dictionary;
pub mod error;
pub mod lookup;
pub mod options;

pub use dictionary::{ColumnKind, ColumnSpec, Dictionary};
pub use error::{ModelError, Result};
pub use lookup::CaseInsensitiveSet;
pub use options::{
    CheckOptions, DEFAULT_EXPECTED_PREGNUM_ONE, DEFAULT_EXPECTED_ROWS, DEFAULT_PREGNANCY_DAT,
    DEFAULT_PREGNANCY_DCT, DEFAULT_RESPONDENT_DAT, DEFAULT_RESPONDENT_DCT, DatasetSource,
    MissingCasePolicy,
};
