//! Tests for the pregnancy index builder.

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame};
use proptest::prelude::*;

use nsfg_validate::{CaseLookup, ValidateError, build_pregnancy_index};

fn caseid_frame(caseids: Vec<Option<&str>>) -> DataFrame {
    DataFrame::new(vec![Column::new("caseid".into(), caseids)]).expect("dataframe")
}

#[test]
fn groups_row_positions_by_caseid() {
    let preg = caseid_frame(vec![Some("A"), Some("A"), Some("B")]);
    let index = build_pregnancy_index(&preg).unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(index.positions("A"), Some(&[0usize, 1][..]));
    assert_eq!(index.positions("B"), Some(&[2usize][..]));
    assert_eq!(index.pregnancy_count("A"), Some(2));
    assert_eq!(index.pregnancy_count("Z"), None);
    assert!(!index.contains("Z"));
}

#[test]
fn positions_keep_table_order_when_interleaved() {
    let preg = caseid_frame(vec![Some("B"), Some("A"), Some("B"), Some("A"), Some("B")]);
    let index = build_pregnancy_index(&preg).unwrap();

    assert_eq!(index.positions("A"), Some(&[1usize, 3][..]));
    assert_eq!(index.positions("B"), Some(&[0usize, 2, 4][..]));
    assert_eq!(index.indexed_rows(), 5);
}

#[test]
fn empty_table_gives_empty_index() {
    let preg = caseid_frame(Vec::new());
    let index = build_pregnancy_index(&preg).unwrap();
    assert!(index.is_empty());
    assert_eq!(index.iter().count(), 0);
}

#[test]
fn blank_caseids_are_skipped() {
    let preg = caseid_frame(vec![Some("A"), None, Some("  ")]);
    let index = build_pregnancy_index(&preg).unwrap();

    assert_eq!(index.len(), 1);
    assert_eq!(index.skipped_rows(), 2);
    assert_eq!(index.indexed_rows(), 1);
}

#[test]
fn integer_caseids_are_keyed_by_text() {
    let preg = DataFrame::new(vec![Column::new(
        "CASEID".into(),
        vec![Some(1i64), Some(1), Some(2)],
    )])
    .unwrap();
    let index = build_pregnancy_index(&preg).unwrap();
    assert_eq!(index.pregnancy_count("1"), Some(2));
    assert_eq!(index.pregnancy_count("2"), Some(1));
}

#[test]
fn missing_caseid_column_is_an_error() {
    let preg = DataFrame::new(vec![Column::new("agepreg".into(), vec![1i64])]).unwrap();
    let err = build_pregnancy_index(&preg).unwrap_err();
    assert!(matches!(err, ValidateError::MissingColumn { column } if column == "caseid"));
}

#[test]
fn rebuilding_is_deterministic() {
    let preg = caseid_frame(vec![Some("C"), Some("A"), Some("C")]);
    assert_eq!(
        build_pregnancy_index(&preg).unwrap(),
        build_pregnancy_index(&preg).unwrap()
    );
}

proptest! {
    #[test]
    fn index_lengths_match_row_counts(keys in prop::collection::vec(0u8..8, 0..60)) {
        let caseids: Vec<String> = keys.iter().map(|k| format!("case{k}")).collect();
        let preg = DataFrame::new(vec![Column::new("caseid".into(), caseids.clone())]).unwrap();
        let index = build_pregnancy_index(&preg).unwrap();

        let mut expected: BTreeMap<&str, usize> = BTreeMap::new();
        for caseid in &caseids {
            *expected.entry(caseid.as_str()).or_default() += 1;
        }

        prop_assert_eq!(index.len(), expected.len());
        for (caseid, count) in &expected {
            prop_assert_eq!(index.pregnancy_count(caseid), Some(*count));
        }
        for k in 8u8..10 {
            let absent = format!("case{k}");
            prop_assert!(!index.contains(&absent));
        }
    }
}
