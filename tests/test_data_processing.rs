//! Integration test: loading and validating dataset files

mod common;

use polars::prelude::DataType;
use stunting_predictor::dataset::{describe, StuntingDataset};
use stunting_predictor::error::StuntingError;

const HEADER: &str = "Sex,Age,Birth Weight,Birth Length,Body Weight,Body Length,ASI Eksklusif,Stunting";

#[test]
fn test_load_csv_dataset() {
    let file = common::csv_file(&format!(
        "{}\nMale,12,3.1,49.0,9.5,74.0,Yes,No\nFemale,24,2.6,46.5,9.0,76.0,No,Yes\n\
         Female,36,3.3,50.0,13.2,,Yes,No\n",
        HEADER
    ));

    let dataset = StuntingDataset::load(file.path()).unwrap();
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.source(), Some(file.path()));
    assert_eq!(dataset.total_missing(), 1);

    let missing = dataset.missing_values();
    let body_length = missing.iter().find(|m| m.column == "Body Length").unwrap();
    assert_eq!(body_length.count, 1);
}

const XLSX_HEADER: [&str; 8] = [
    " Sex ",
    "Age",
    "Birth Weight",
    "Birth Length",
    "Body Weight",
    "Body Length",
    "ASI Eksklusif",
    "Stunting",
];

#[test]
fn test_load_workbook_dataset() {
    let file = common::xlsx_file(&[
        &XLSX_HEADER,
        &["Male", "12", "3.1", "49", "9.5", "74", "Yes", "No"],
        &["", "", "", "", "", "", "", ""],
        &["Female", "24", "2.6", "46.5", "9", "76", "No", "Yes"],
        &["Female", "36", "3.3", "50", "13.2", "", "Yes", "No"],
    ]);

    let dataset = StuntingDataset::load(file.path()).unwrap();
    // the blank row is skipped
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.total_missing(), 1);

    let frame = dataset.frame();
    assert_eq!(frame.column("Sex").unwrap().dtype(), &DataType::String);
    assert_eq!(frame.column("Age").unwrap().dtype(), &DataType::Int64);
    assert_eq!(frame.column("Body Weight").unwrap().dtype(), &DataType::Float64);

    let ages: Vec<i64> = frame
        .column("Age")
        .unwrap()
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(ages, vec![12, 24, 36]);

    let sex: Vec<&str> = frame
        .column("Sex")
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(sex, vec!["Male", "Female", "Female"]);
}

#[test]
fn test_workbook_missing_column() {
    let file = common::xlsx_file(&[
        &["Sex", "Age", "Birth Weight", "Birth Length", "Body Weight", "ASI Eksklusif", "Stunting"],
        &["Male", "12", "3.1", "49", "9.5", "Yes", "No"],
    ]);

    let err = StuntingDataset::load(file.path()).unwrap_err();
    assert!(matches!(err, StuntingError::SchemaError(_)));
    assert!(err.to_string().contains("Body Length"));
}

#[test]
fn test_workbook_fractional_age() {
    let file = common::xlsx_file(&[
        &XLSX_HEADER,
        &["Male", "12.5", "3.1", "49", "9.5", "74", "Yes", "No"],
    ]);

    let err = StuntingDataset::load(file.path()).unwrap_err();
    assert!(matches!(err, StuntingError::SchemaError(_)));
    assert!(err.to_string().contains("Age"));
}

#[test]
fn test_missing_file() {
    let err = StuntingDataset::load("does/not/exist.xlsx").unwrap_err();
    assert!(matches!(err, StuntingError::DataError(_)));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_missing_column() {
    let file = common::csv_file(
        "Sex,Age,Birth Weight,Birth Length,Body Weight,ASI Eksklusif,Stunting\n\
         Male,12,3.1,49.0,9.5,Yes,No\n",
    );

    let err = StuntingDataset::load(file.path()).unwrap_err();
    assert!(matches!(err, StuntingError::SchemaError(_)));
    assert!(err.to_string().contains("Body Length"));
}

#[test]
fn test_non_numeric_measurement() {
    let file = common::csv_file(&format!(
        "{}\nMale,12,heavy,49.0,9.5,74.0,Yes,No\n",
        HEADER
    ));
    let err = StuntingDataset::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("Birth Weight"));
}

#[test]
fn test_unsupported_extension() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    std::io::Write::write_all(&mut file, b"{}").unwrap();
    let err = StuntingDataset::load(file.path()).unwrap_err();
    assert!(matches!(err, StuntingError::ConfigError(_)));
}

#[test]
fn test_describe_covers_every_numeric_column() {
    let dataset = common::dataset();
    // text columns are skipped before encoding
    let summaries = describe(dataset.frame()).unwrap();
    let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Age", "Birth Weight", "Birth Length", "Body Weight", "Body Length"]
    );
    assert!(summaries.iter().all(|s| s.count == 200));
}
