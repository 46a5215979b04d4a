//! End-to-end check runs against small gzip fixtures.

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

use nsfg_cli::check::{CheckPlan, run_check};
use nsfg_model::{CheckOptions, MissingCasePolicy};

const RESP_DCT: &str = r#"infile dictionary {
    _column(1)      str12    caseid     %12s  "RESPONDENT ID NUMBER"
    _column(13)     byte     pregnum     %2f  "CURRENT PREGNANCY COUNT"
}
"#;

const PREG_DCT: &str = r#"infile dictionary {
    _column(1)      str12    caseid      %12s  "RESPONDENT ID NUMBER"
    _column(13)     int      agepreg      %4f  "AGE AT PREGNANCY OUTCOME"
}
"#;

fn write_gzip(path: &Path, contents: &str) {
    let file = fs::File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(contents.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

/// Respondents 1 (two pregnancies), 2 (one) and 3 (one).
fn fixture_dir(pregnancy_rows: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("2002FemResp.dct"), RESP_DCT).unwrap();
    write_gzip(
        &dir.path().join("2002FemResp.dat.gz"),
        "           1 2\n           2 1\n           3 1\n",
    );
    fs::write(dir.path().join("2002FemPreg.dct"), PREG_DCT).unwrap();
    write_gzip(&dir.path().join("2002FemPreg.dat.gz"), pregnancy_rows);
    dir
}

const CONSISTENT_PREGNANCIES: &str =
    "           12250\n           12875\n           23016\n           31900\n";

fn plan(dir: &TempDir) -> CheckPlan {
    let mut plan = CheckPlan::default().with_data_dir(dir.path());
    plan.options = CheckOptions {
        expected_rows: 3,
        expected_pregnum_one: 2,
        missing_case: MissingCasePolicy::Fail,
    };
    plan
}

#[test]
fn consistent_files_pass_every_step() {
    let dir = fixture_dir(CONSISTENT_PREGNANCIES);
    let report = run_check(&plan(&dir)).expect("check passes");

    assert_eq!(report.respondent_rows, 3);
    assert_eq!(report.respondent_columns, 2);
    let names: Vec<&str> = report.steps.iter().map(|step| step.name).collect();
    assert_eq!(
        names,
        vec![
            "load respondents",
            "respondent rows",
            "pregnum == 1",
            "pregnum matches pregnancies"
        ]
    );
    assert_eq!(report.steps[1].actual, "3");
    assert_eq!(
        (report.steps[2].expected.as_str(), report.steps[2].actual.as_str()),
        ("2", "2")
    );
}

#[test]
fn wrong_row_count_stops_the_run() {
    let dir = fixture_dir(CONSISTENT_PREGNANCIES);
    let mut plan = plan(&dir);
    plan.options.expected_rows = 7643;

    let err = run_check(&plan).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("respondent row count"), "{message}");
    assert!(message.contains("expected 7643 rows, found 3"), "{message}");
}

#[test]
fn wrong_pregnum_frequency_stops_the_run() {
    let dir = fixture_dir(CONSISTENT_PREGNANCIES);
    let mut plan = plan(&dir);
    plan.options.expected_pregnum_one = 1267;

    let err = run_check(&plan).unwrap_err();
    assert!(format!("{err:#}").contains("expected 1267 rows with pregnum == 1, found 2"));
}

#[test]
fn mismatch_reports_case_and_counts() {
    // Respondent 1 claims two pregnancies but only one row exists.
    let dir = fixture_dir("           12250\n           23016\n           31900\n");

    let err = run_check(&plan(&dir)).unwrap_err();
    let message = format!("{err:#}");
    assert!(
        message.contains("caseid 1 has 1 pregnancy records but pregnum is 2"),
        "{message}"
    );
}

#[test]
fn respondent_without_pregnancies_follows_policy() {
    let dir = fixture_dir("           12250\n           12875\n           23016\n");

    let err = run_check(&plan(&dir)).unwrap_err();
    assert!(format!("{err:#}").contains("caseid 3 not found in pregnancy index"));

    let mut lenient = plan(&dir);
    lenient.options.missing_case = MissingCasePolicy::TreatAsZero;
    let err = run_check(&lenient).unwrap_err();
    assert!(format!("{err:#}").contains("caseid 3 has 0 pregnancy records but pregnum is 1"));
}

#[test]
fn missing_data_file_is_a_load_failure() {
    let dir = TempDir::new().unwrap();
    let err = run_check(&plan(&dir)).unwrap_err();
    assert!(format!("{err:#}").starts_with("load respondents from "));
}

#[test]
fn row_cap_leaves_pregnancy_table_whole() {
    // Respondent 2 comes first; its pregnancy row sits after respondent 1's.
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("2002FemResp.dct"), RESP_DCT).unwrap();
    write_gzip(
        &dir.path().join("2002FemResp.dat.gz"),
        "           2 1\n           1 2\n",
    );
    fs::write(dir.path().join("2002FemPreg.dct"), PREG_DCT).unwrap();
    write_gzip(
        &dir.path().join("2002FemPreg.dat.gz"),
        "           12250\n           12875\n           23016\n",
    );

    let mut plan = plan(&dir).with_max_rows(Some(1));
    plan.options.expected_rows = 1;
    plan.options.expected_pregnum_one = 1;

    let report = run_check(&plan).expect("capped consistent files pass");
    assert_eq!(report.respondent_rows, 1);
    assert_eq!(plan.pregnancies.max_rows, None);
}
