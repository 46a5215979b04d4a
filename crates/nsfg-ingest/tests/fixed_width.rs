//! Tests for fixed-width decoding.

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::Compression as GzLevel;
use flate2::write::GzEncoder;
use polars::prelude::{AnyValue, DataType};
use proptest::prelude::*;
use tempfile::TempDir;

use nsfg_ingest::{
    Compression, FixedWidthOptions, IngestError, any_to_string, decode_reader, read_fixed_width,
};
use nsfg_model::{ColumnKind, Dictionary};

fn two_column_dictionary() -> Dictionary {
    Dictionary::from_widths([
        ("col1", 3, ColumnKind::Text),
        ("col2", 5, ColumnKind::Integer),
    ])
    .unwrap()
}

fn write_gzip(path: &Path, contents: &str) {
    let file = fs::File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, GzLevel::default());
    encoder.write_all(contents.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

#[test]
fn decodes_line_by_declared_types() {
    let df = decode_reader(
        &two_column_dictionary(),
        "ABC12345\n".as_bytes(),
        Path::new("inline"),
        None,
    )
    .unwrap();

    assert_eq!(df.height(), 1);
    assert_eq!(df.width(), 2);
    assert_eq!(df.column("col1").unwrap().dtype(), &DataType::String);
    assert_eq!(df.column("col2").unwrap().dtype(), &DataType::Int64);
    assert_eq!(
        df.column("col1").unwrap().get(0).unwrap(),
        AnyValue::String("ABC")
    );
    assert_eq!(
        df.column("col2").unwrap().get(0).unwrap(),
        AnyValue::Int64(12345)
    );
}

#[test]
fn blank_and_short_fields_are_null() {
    let data = "AB    7\nXYZ\n   \n";
    let df = decode_reader(&two_column_dictionary(), data.as_bytes(), Path::new("inline"), None)
        .unwrap();

    // whitespace-only line skipped
    assert_eq!(df.height(), 2);
    let col2 = df.column("col2").unwrap();
    assert_eq!(col2.get(0).unwrap(), AnyValue::Int64(7));
    assert_eq!(col2.get(1).unwrap(), AnyValue::Null);
    assert_eq!(col2.null_count(), 1);
}

#[test]
fn bad_numeric_field_is_fatal() {
    let data = "ABC00001\nDEF12x45\n";
    let err = decode_reader(&two_column_dictionary(), data.as_bytes(), Path::new("resp.dat"), None)
        .unwrap_err();

    match err {
        IngestError::FieldDecode {
            line,
            column,
            value,
            kind,
            ..
        } => {
            assert_eq!(line, 2);
            assert_eq!(column, "col2");
            assert_eq!(value, "12x45");
            assert_eq!(kind, ColumnKind::Integer);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn max_rows_caps_decoding() {
    let data = "AAA00001\nBBB00002\nCCC00003\n";
    let df = decode_reader(
        &two_column_dictionary(),
        data.as_bytes(),
        Path::new("inline"),
        Some(2),
    )
    .unwrap();
    assert_eq!(df.height(), 2);
}

#[test]
fn reads_gzip_by_extension_and_by_magic() {
    let dir = TempDir::new().unwrap();
    let data = "AAA00001\r\nBBB00002\r\n";

    let gz = dir.path().join("resp.dat.gz");
    write_gzip(&gz, data);
    let df = read_fixed_width(&two_column_dictionary(), &gz, &FixedWidthOptions::default())
        .unwrap();
    assert_eq!(df.height(), 2);
    assert_eq!(
        df.column("col2").unwrap().get(1).unwrap(),
        AnyValue::Int64(2)
    );

    let disguised = dir.path().join("resp.dat");
    write_gzip(&disguised, data);
    let df = read_fixed_width(
        &two_column_dictionary(),
        &disguised,
        &FixedWidthOptions::default(),
    )
    .unwrap();
    assert_eq!(df.height(), 2);
}

#[test]
fn plain_file_with_explicit_compression() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("resp.dat");
    fs::write(&path, "AAA00001\n").unwrap();

    let options = FixedWidthOptions::default().with_compression(Compression::None);
    let df = read_fixed_width(&two_column_dictionary(), &path, &options).unwrap();
    assert_eq!(df.height(), 1);
}

#[test]
fn missing_data_file_is_a_read_error() {
    let err = read_fixed_width(
        &two_column_dictionary(),
        Path::new("/nonexistent/2002FemResp.dat.gz"),
        &FixedWidthOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::FileRead { .. }));
}

#[test]
fn empty_source_yields_typed_empty_frame() {
    let df = decode_reader(&two_column_dictionary(), "".as_bytes(), Path::new("inline"), None)
        .unwrap();
    assert_eq!(df.height(), 0);
    assert_eq!(df.width(), 2);
}

proptest! {
    // R lines of a C-column layout decode to R rows of C fields, and each
    // field renders back to its trimmed source text.
    #[test]
    fn decode_is_complete(
        rows in prop::collection::vec(
            ("[A-Z]{0,4}", 0u32..100_000u32, prop::option::of(0u16..1000u16)),
            0..20,
        )
    ) {
        let dct = Dictionary::from_widths([
            ("name", 4, ColumnKind::Text),
            ("count", 6, ColumnKind::Integer),
            ("score", 4, ColumnKind::Float),
        ])
        .unwrap();

        let mut data = String::new();
        for (name, count, score) in &rows {
            let score = score.map(|s| s.to_string()).unwrap_or_default();
            data.push_str(&format!("{name:<4}{count:>6}{score:>4}\n"));
        }

        let df = decode_reader(&dct, data.as_bytes(), Path::new("prop"), None).unwrap();
        prop_assert_eq!(df.height(), rows.len());
        prop_assert_eq!(df.width(), 3);

        for (idx, (name, count, score)) in rows.iter().enumerate() {
            let got_name = any_to_string(df.column("name").unwrap().get(idx).unwrap());
            prop_assert_eq!(got_name, name.clone());
            let got_count = any_to_string(df.column("count").unwrap().get(idx).unwrap());
            prop_assert_eq!(got_count, count.to_string());
            let got_score = any_to_string(df.column("score").unwrap().get(idx).unwrap());
            prop_assert_eq!(got_score, score.map(|s| s.to_string()).unwrap_or_default());
        }
    }
}
