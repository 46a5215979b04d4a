//! Consistency checks for the NSFG respondent and pregnancy tables.
//!
//! - [`build_pregnancy_index`]: case id to pregnancy row positions
//! - [`check_pregnum`] / [`validate_pregnum_consistency`]: respondent
//!   `pregnum` against the number of indexed pregnancy rows
//! - [`expect_row_count`] / [`expect_value_frequency`]: dataset shape

mod error;
mod index;
mod pregnum;
mod shape;

pub use error::{Result, ValidateError};
pub use index::{CASEID, CaseLookup, PregnancyIndex, build_pregnancy_index, case_key};
pub use pregnum::{
    PREGNUM, PregnumCheck, PregnumMismatch, check_pregnum, validate_pregnum_consistency,
};
pub use shape::{expect_row_count, expect_value_frequency, value_frequency};
