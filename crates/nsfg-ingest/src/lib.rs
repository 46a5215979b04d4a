//! NSFG data ingestion.
//!
//! Reads Stata dictionaries and the fixed-width (optionally gzip-compressed)
//! data files they describe into Polars DataFrames.
//!
//! # Features
//!
//! - **Dictionary parsing**: `_column(N)` entries of a `.dct` file become a [`Dictionary`]
//! - **Fixed-width decoding**: typed columns, blank fields as nulls, optional row cap
//! - **Loaders**: respondent and pregnancy tables with their cleaning passes
//!
//! # Example
//!
//! ```ignore
//! use nsfg_ingest::{load_respondents, PregnancyLoader, PregnancySource};
//! use nsfg_model::DatasetSource;
//!
//! let resp = load_respondents(&DatasetSource::respondents())?;
//! let preg = PregnancyLoader::default().load_pregnancies()?;
//! ```
//!
//! [`Dictionary`]: nsfg_model::Dictionary

mod clean;
mod dct;
mod error;
mod fixed_width;
mod loader;
mod polars_utils;

// === Error Types ===
pub use error::{IngestError, Result};

// === Dictionary ===
pub use dct::{format_width, parse_stata_dct, read_stata_dct, storage_kind};

// === Fixed-Width Decoding ===
pub use fixed_width::{
    Compression, FixedWidthOptions, decode_reader, open_data, read_fixed_width,
};

// === Loaders ===
pub use clean::{PregnancyCleaner, RespondentCleaner, TableCleaner};
pub use loader::{PregnancyLoader, PregnancySource, load_respondents, load_table};

// === Value Helpers ===
pub use polars_utils::{
    any_to_f64, any_to_i64, any_to_string, any_to_string_non_empty, find_column, format_numeric,
    parse_f64, parse_i64,
};
