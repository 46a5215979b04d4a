//! Fixed-width record decoding.
//!
//! Every non-blank line of the data source becomes one row. Each column of
//! the [`Dictionary`] slices its byte range out of the line, trims it and
//! converts it to the declared kind. Blank fields (including fields past the
//! end of a short line) decode to null; non-blank fields that fail to parse
//! as their declared numeric kind abort the load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use flate2::read::MultiGzDecoder;
use polars::prelude::{Column, DataFrame};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use nsfg_model::{ColumnKind, ColumnSpec, Dictionary};

use crate::error::{IngestError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compression applied to a data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Gzip when the file has a `.gz` extension or starts with the gzip magic bytes.
    #[default]
    Infer,
    Gzip,
    None,
}

/// Options for [`read_fixed_width`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedWidthOptions {
    pub compression: Compression,
    /// Stop after this many rows.
    pub max_rows: Option<usize>,
}

impl FixedWidthOptions {
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    #[must_use]
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }
}

/// Decode a fixed-width data file into a DataFrame with one column per
/// dictionary entry, in dictionary order.
pub fn read_fixed_width(
    dictionary: &Dictionary,
    path: &Path,
    options: &FixedWidthOptions,
) -> Result<DataFrame> {
    let start = Instant::now();
    let reader = open_data(path, options.compression)?;
    let df = decode_reader(dictionary, reader, path, options.max_rows)?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        duration_ms = start.elapsed().as_millis(),
        "decoded fixed-width file"
    );
    Ok(df)
}

/// Open a data file, transparently decompressing gzip.
pub fn open_data(path: &Path, compression: Compression) -> Result<Box<dyn BufRead>> {
    let read_err = |source: std::io::Error| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(read_err)?;
    let mut reader = BufReader::new(file);

    let gzip = match compression {
        Compression::Gzip => true,
        Compression::None => false,
        Compression::Infer => {
            let by_extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("gz"))
                .unwrap_or(false);
            by_extension || reader.fill_buf().map_err(read_err)?.starts_with(&GZIP_MAGIC)
        }
    };
    debug!(path = %path.display(), gzip, "opening data file");

    if gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Decode lines from any buffered reader. `origin` names the source in errors.
pub fn decode_reader<R: BufRead>(
    dictionary: &Dictionary,
    reader: R,
    origin: &Path,
    max_rows: Option<usize>,
) -> Result<DataFrame> {
    let mut buffers: Vec<ColumnBuffer> = dictionary
        .columns()
        .iter()
        .map(|spec| ColumnBuffer::new(spec.kind))
        .collect();
    let limit = max_rows.unwrap_or(usize::MAX);
    let mut rows = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        if rows >= limit {
            break;
        }
        let line = line.map_err(|source| IngestError::FileRead {
            path: origin.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        for (spec, buffer) in dictionary.columns().iter().zip(buffers.iter_mut()) {
            let raw = slice_field(&line, spec);
            buffer
                .push(&raw)
                .map_err(|()| IngestError::FieldDecode {
                    path: origin.to_path_buf(),
                    line: idx + 1,
                    column: spec.name.clone(),
                    value: raw.trim().to_string(),
                    kind: spec.kind,
                })?;
        }
        rows += 1;
    }

    let columns: Vec<Column> = dictionary
        .columns()
        .iter()
        .zip(buffers)
        .map(|(spec, buffer)| buffer.into_column(&spec.name))
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Extract the raw text of one field, clamped to the line length.
fn slice_field<'a>(line: &'a str, spec: &ColumnSpec) -> std::borrow::Cow<'a, str> {
    let bytes = line.as_bytes();
    let start = spec.start.min(bytes.len());
    let end = spec.end().min(bytes.len());
    String::from_utf8_lossy(&bytes[start..end])
}

/// Decode one trimmed field. `Ok(None)` is a missing value.
fn decode_field(raw: &str, kind: ColumnKind) -> std::result::Result<Option<FieldValue>, ()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match kind {
        ColumnKind::Text => Ok(Some(FieldValue::Text(trimmed.to_string()))),
        ColumnKind::Integer => trimmed
            .parse::<i64>()
            .map(|v| Some(FieldValue::Integer(v)))
            .map_err(|_| ()),
        ColumnKind::Float => trimmed
            .parse::<f64>()
            .map(|v| Some(FieldValue::Float(v)))
            .map_err(|_| ()),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

enum ColumnBuffer {
    Text(Vec<Option<String>>),
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
}

impl ColumnBuffer {
    fn new(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Text => Self::Text(Vec::new()),
            ColumnKind::Integer => Self::Integer(Vec::new()),
            ColumnKind::Float => Self::Float(Vec::new()),
        }
    }

    fn kind(&self) -> ColumnKind {
        match self {
            Self::Text(_) => ColumnKind::Text,
            Self::Integer(_) => ColumnKind::Integer,
            Self::Float(_) => ColumnKind::Float,
        }
    }

    fn push(&mut self, raw: &str) -> std::result::Result<(), ()> {
        let value = decode_field(raw, self.kind())?;
        match (self, value) {
            (Self::Text(values), Some(FieldValue::Text(v))) => values.push(Some(v)),
            (Self::Integer(values), Some(FieldValue::Integer(v))) => values.push(Some(v)),
            (Self::Float(values), Some(FieldValue::Float(v))) => values.push(Some(v)),
            (Self::Text(values), _) => values.push(None),
            (Self::Integer(values), _) => values.push(None),
            (Self::Float(values), _) => values.push(None),
        }
        Ok(())
    }

    fn into_column(self, name: &str) -> Column {
        match self {
            Self::Text(values) => Column::new(name.into(), values),
            Self::Integer(values) => Column::new(name.into(), values),
            Self::Float(values) => Column::new(name.into(), values),
        }
    }
}
