//! Fixed-width column layouts.
//!
//! A [`Dictionary`] is the ordered list of columns that slices every record
//! line of a fixed-width data file. Layouts come either from explicit offsets
//! (Stata `_column(N)` entries) or from widths alone, in which case each
//! column starts where the previous one ends.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::lookup::CaseInsensitiveSet;

/// Declared value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
}

impl ColumnKind {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Integer => "integer",
            Self::Float => "float",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One column of a fixed-width record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Zero-based character offset of the first character.
    pub start: usize,
    /// Number of characters occupied by the field.
    pub width: usize,
    /// Declared type used to decode the trimmed field text.
    pub kind: ColumnKind,
    /// Optional description from the dictionary source.
    pub label: Option<String>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, start: usize, width: usize, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            start,
            width,
            kind,
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.start + self.width
    }
}

/// Ordered, validated column layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    columns: Vec<ColumnSpec>,
}

impl Dictionary {
    /// Build a dictionary from columns with explicit offsets.
    ///
    /// Columns must be non-empty, in ascending offset order, non-overlapping,
    /// have positive widths and unique names (compared case-insensitively).
    /// Gaps between columns are allowed.
    pub fn new(columns: Vec<ColumnSpec>) -> Result<Self> {
        if columns.is_empty() {
            return Err(ModelError::EmptyDictionary);
        }

        let mut seen = CaseInsensitiveSet::default();
        let mut previous: Option<&ColumnSpec> = None;
        for column in &columns {
            if column.width == 0 {
                return Err(ModelError::ZeroWidth {
                    name: column.name.clone(),
                });
            }
            if !seen.insert(&column.name) {
                return Err(ModelError::DuplicateColumn {
                    name: column.name.clone(),
                });
            }
            if let Some(prev) = previous
                && column.start < prev.end()
            {
                return Err(ModelError::Overlap {
                    name: column.name.clone(),
                    start: column.start,
                    previous: prev.name.clone(),
                    previous_end: prev.end(),
                });
            }
            previous = Some(column);
        }

        Ok(Self { columns })
    }

    /// Build a gap-free dictionary where offsets are the running sum of widths.
    pub fn from_widths<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, usize, ColumnKind)>,
        S: Into<String>,
    {
        let mut offset = 0usize;
        let specs = columns
            .into_iter()
            .map(|(name, width, kind)| {
                let spec = ColumnSpec::new(name, offset, width, kind);
                offset += width;
                spec
            })
            .collect();
        Self::new(specs)
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    /// Case-insensitive column lookup.
    pub fn get(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
    }

    /// Length of a complete record: the end of the last column.
    pub fn record_length(&self) -> usize {
        self.columns.last().map(ColumnSpec::end).unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = &'a ColumnSpec;
    type IntoIter = std::slice::Iter<'a, ColumnSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
