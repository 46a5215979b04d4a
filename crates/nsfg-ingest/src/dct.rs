//! Stata dictionary (`.dct`) parsing.
//!
//! Only `_column(N)` entries are significant:
//!
//! ```text
//! infile dictionary {
//!     _column(1)      str12    caseid     %12s  "RESPONDENT ID NUMBER"
//!     _column(13)     byte     rscrinf     %1f  "WHETHER R IS SCREENER INFORMANT"
//! }
//! ```
//!
//! `N` is a one-based character offset. A field runs up to the next
//! column's offset. The last column, and any column whose successor does not
//! start after it, takes its width from the display format (`%12s`, `%3.1f`).

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use nsfg_model::{ColumnKind, ColumnSpec, Dictionary};

use crate::error::{IngestError, Result};

static COLUMN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_column\(([^)]*)\)").expect("Invalid _column regex"));

static FORMAT_WIDTH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^%-?(\d+)").expect("Invalid display format regex"));

/// Map a Stata storage type to a column kind.
pub fn storage_kind(storage: &str) -> Option<ColumnKind> {
    let lower = storage.to_ascii_lowercase();
    match lower.as_str() {
        "byte" | "int" | "long" => Some(ColumnKind::Integer),
        "float" | "double" | "numeric" => Some(ColumnKind::Float),
        _ if lower.starts_with("str") => Some(ColumnKind::Text),
        _ => None,
    }
}

/// Width declared by a display format such as `%12s` or `%3.1f`.
pub fn format_width(format: &str) -> Option<usize> {
    FORMAT_WIDTH_REGEX
        .captures(format)
        .and_then(|caps| caps[1].parse::<usize>().ok())
        .filter(|width| *width > 0)
}

/// Read and parse a Stata dictionary file.
pub fn read_stata_dct(path: &Path) -> Result<Dictionary> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let dictionary = parse_stata_dct(&text, path)?;
    debug!(
        path = %path.display(),
        columns = dictionary.len(),
        record_length = dictionary.record_length(),
        "parsed stata dictionary"
    );
    Ok(dictionary)
}

struct Entry {
    line: usize,
    start: usize,
    width: Option<usize>,
    name: String,
    kind: ColumnKind,
    label: Option<String>,
}

/// Parse Stata dictionary text. `origin` is only used in error messages.
pub fn parse_stata_dct(text: &str, origin: &Path) -> Result<Dictionary> {
    let syntax = |line: usize, reason: String| IngestError::DictionarySyntax {
        path: origin.to_path_buf(),
        line,
        reason,
    };

    let mut entries: Vec<Entry> = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let Some(caps) = COLUMN_REGEX.captures(raw) else {
            continue;
        };
        let Some(whole) = caps.get(0) else {
            continue;
        };

        let position = caps[1].trim();
        let start = match position.parse::<usize>() {
            Ok(value) if value >= 1 => value - 1,
            _ => return Err(syntax(line, format!("invalid column position '{position}'"))),
        };

        let rest = &raw[whole.end()..];
        let mut tokens = rest.split_whitespace();
        let (Some(storage), Some(name)) = (tokens.next(), tokens.next()) else {
            return Err(syntax(line, "expected storage type and name".to_string()));
        };
        let name = name.to_ascii_lowercase();
        let kind = storage_kind(storage).ok_or_else(|| IngestError::UnknownStorageType {
            path: origin.to_path_buf(),
            column: name.clone(),
            storage: storage.to_string(),
        })?;

        let remaining: Vec<&str> = tokens.collect();
        let (width, description) = match remaining.split_first() {
            Some((format, tail)) if format.starts_with('%') => (format_width(format), tail),
            _ => (None, remaining.as_slice()),
        };
        let label = description.join(" ").trim().trim_matches('"').trim().to_string();

        entries.push(Entry {
            line,
            start,
            width,
            name,
            kind,
            label: (!label.is_empty()).then_some(label),
        });
    }

    let next_starts: Vec<Option<usize>> = entries
        .iter()
        .skip(1)
        .map(|entry| Some(entry.start))
        .chain(std::iter::once(None))
        .collect();

    let mut columns = Vec::with_capacity(entries.len());
    for (entry, next_start) in entries.into_iter().zip(next_starts) {
        let width = match (entry.width, next_start) {
            (_, Some(next)) if next > entry.start => next - entry.start,
            (Some(width), _) => width,
            _ => {
                return Err(syntax(
                    entry.line,
                    format!("cannot determine width of column '{}'", entry.name),
                ));
            }
        };
        let mut spec = ColumnSpec::new(entry.name, entry.start, width, entry.kind);
        spec.label = entry.label;
        columns.push(spec);
    }

    Dictionary::new(columns).map_err(|source| IngestError::Layout {
        path: PathBuf::from(origin),
        source,
    })
}
