//! Dataset loaders: dictionary + fixed-width data + cleaning pass.

use polars::prelude::DataFrame;
use tracing::{info, info_span};

use nsfg_model::DatasetSource;

use crate::clean::{PregnancyCleaner, RespondentCleaner, TableCleaner};
use crate::dct::read_stata_dct;
use crate::error::Result;
use crate::fixed_width::{FixedWidthOptions, read_fixed_width};

/// Decode `source` using its Stata dictionary, then run `cleaner` over the
/// result. Every non-blank data line becomes one row.
pub fn load_table(source: &DatasetSource, cleaner: &dyn TableCleaner) -> Result<DataFrame> {
    let span = info_span!(
        "load",
        table = cleaner.name(),
        data = %source.data.display()
    );
    let _guard = span.enter();

    let dictionary = read_stata_dct(&source.dictionary)?;
    let options = FixedWidthOptions::default().with_max_rows(source.max_rows);
    let mut df = read_fixed_width(&dictionary, &source.data, &options)?;
    cleaner.clean(&mut df)?;

    info!(rows = df.height(), columns = df.width(), "table loaded");
    Ok(df)
}

/// Load the respondent table.
pub fn load_respondents(source: &DatasetSource) -> Result<DataFrame> {
    load_table(source, &RespondentCleaner)
}

/// Provider of the pregnancy table.
///
/// The consistency check asks for a fresh table on every run rather than
/// taking one from its caller.
pub trait PregnancySource {
    fn load_pregnancies(&self) -> Result<DataFrame>;
}

/// Loads and cleans the NSFG pregnancy file.
#[derive(Debug, Clone)]
pub struct PregnancyLoader {
    source: DatasetSource,
}

impl PregnancyLoader {
    pub fn new(source: DatasetSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }
}

impl Default for PregnancyLoader {
    fn default() -> Self {
        Self::new(DatasetSource::pregnancies())
    }
}

impl PregnancySource for PregnancyLoader {
    fn load_pregnancies(&self) -> Result<DataFrame> {
        load_table(&self.source, &PregnancyCleaner)
    }
}

/// An already-loaded table, handed out as a copy on each request.
impl PregnancySource for DataFrame {
    fn load_pregnancies(&self) -> Result<DataFrame> {
        Ok(self.clone())
    }
}
