//! End-to-end loader tests against small dictionary + data fixtures.

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use polars::prelude::AnyValue;
use tempfile::TempDir;

use nsfg_ingest::{
    IngestError, PregnancyLoader, PregnancySource, any_to_f64, load_respondents,
};
use nsfg_model::DatasetSource;

const RESP_DCT: &str = r#"infile dictionary {
    _column(1)      str12    caseid     %12s  "RESPONDENT ID NUMBER"
    _column(13)     byte     pregnum     %2f  "CURRENT PREGNANCY COUNT"
}
"#;

const PREG_DCT: &str = r#"infile dictionary {
    _column(1)      str12    caseid      %12s  "RESPONDENT ID NUMBER"
    _column(13)     int      agepreg      %4f  "AGE AT PREGNANCY OUTCOME"
    _column(17)     byte     birthwgt_lb  %2f  "BIRTHWEIGHT IN POUNDS"
    _column(19)     byte     birthwgt_oz  %2f  "BIRTHWEIGHT IN OUNCES"
}
"#;

fn write_gzip(path: &Path, contents: &str) {
    let file = fs::File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(contents.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

fn fixture_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("2002FemResp.dct"), RESP_DCT).unwrap();
    write_gzip(
        &dir.path().join("2002FemResp.dat.gz"),
        "           1 2\n           2 0\n           5 1\n",
    );
    fs::write(dir.path().join("2002FemPreg.dct"), PREG_DCT).unwrap();
    write_gzip(
        &dir.path().join("2002FemPreg.dat.gz"),
        "           13316 8 8\n           11875 799\n           52250 612\n",
    );
    dir
}

#[test]
fn loads_respondents_from_default_names() {
    let dir = fixture_dir();
    let source = DatasetSource::respondents().with_data_dir(dir.path());

    let resp = load_respondents(&source).expect("load respondents");
    assert_eq!(resp.height(), 3);
    let names: Vec<String> = resp
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["caseid", "pregnum"]);
    assert_eq!(
        resp.column("caseid").unwrap().get(2).unwrap(),
        AnyValue::String("5")
    );
    assert_eq!(
        resp.column("pregnum").unwrap().get(0).unwrap(),
        AnyValue::Int64(2)
    );
}

#[test]
fn respondent_row_cap_is_honoured() {
    let dir = fixture_dir();
    let source = DatasetSource::respondents()
        .with_data_dir(dir.path())
        .with_max_rows(Some(1));

    let resp = load_respondents(&source).expect("load respondents");
    assert_eq!(resp.height(), 1);
}

#[test]
fn pregnancy_loader_applies_cleaning() {
    let dir = fixture_dir();
    let loader = PregnancyLoader::new(DatasetSource::pregnancies().with_data_dir(dir.path()));

    let preg = loader.load_pregnancies().expect("load pregnancies");
    assert_eq!(preg.height(), 3);

    let age = preg.column("agepreg").unwrap();
    assert_eq!(any_to_f64(age.get(0).unwrap()), Some(33.16));

    let oz = preg.column("birthwgt_oz").unwrap();
    assert_eq!(oz.get(1).unwrap(), AnyValue::Null);

    let total = preg.column("totalwgt_lb").unwrap();
    assert_eq!(any_to_f64(total.get(0).unwrap()), Some(8.5));
    assert_eq!(any_to_f64(total.get(2).unwrap()), Some(6.75));
}

#[test]
fn loading_twice_is_identical() {
    let dir = fixture_dir();
    let loader = PregnancyLoader::new(DatasetSource::pregnancies().with_data_dir(dir.path()));

    let first = loader.load_pregnancies().unwrap();
    let second = loader.load_pregnancies().unwrap();
    assert!(first.equals_missing(&second));
}

#[test]
fn missing_dictionary_is_fatal() {
    let dir = TempDir::new().unwrap();
    let source = DatasetSource::respondents().with_data_dir(dir.path());

    let err = load_respondents(&source).unwrap_err();
    assert!(matches!(err, IngestError::FileRead { .. }));
}
