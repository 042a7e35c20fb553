//! Shared fixtures for integration tests

#![allow(dead_code)]

use polars::prelude::*;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use stunting_predictor::dataset::StuntingDataset;
use stunting_predictor::inference::PredictionInput;
use std::io::Write;

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Synthetic stunting records: stunted children are markedly shorter than
/// the age trend and are breastfed exclusively less often.
pub fn synthetic_frame(n: usize, seed: u64) -> DataFrame {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let mut sex = Vec::with_capacity(n);
    let mut age = Vec::with_capacity(n);
    let mut birth_weight = Vec::with_capacity(n);
    let mut birth_length = Vec::with_capacity(n);
    let mut body_weight = Vec::with_capacity(n);
    let mut body_length = Vec::with_capacity(n);
    let mut asi = Vec::with_capacity(n);
    let mut stunting = Vec::with_capacity(n);

    for _ in 0..n {
        let stunted = rng.gen_bool(0.35);
        let months: i64 = rng.gen_range(1..=60);
        let trend = 48.0 + 0.8 * months as f64;
        let deficit = if stunted {
            rng.gen_range(7.0..12.0)
        } else {
            rng.gen_range(-2.0..2.0)
        };

        sex.push(if rng.gen_bool(0.5) { "Female" } else { "Male" });
        age.push(months);
        birth_weight.push(round1(rng.gen_range(2.3..4.0) - if stunted { 0.3 } else { 0.0 }));
        birth_length.push(round1(rng.gen_range(45.0..53.0)));
        body_weight.push(round1(
            3.5 + 0.2 * months as f64 + rng.gen_range(-0.8..0.8) - if stunted { 1.0 } else { 0.0 },
        ));
        body_length.push(round1(trend - deficit));
        asi.push(if rng.gen_bool(if stunted { 0.4 } else { 0.7 }) {
            "Yes"
        } else {
            "No"
        });
        stunting.push(if stunted { "Yes" } else { "No" });
    }

    DataFrame::new(vec![
        Series::new("Sex".into(), sex).into(),
        Series::new("Age".into(), age).into(),
        Series::new("Birth Weight".into(), birth_weight).into(),
        Series::new("Birth Length".into(), birth_length).into(),
        Series::new("Body Weight".into(), body_weight).into(),
        Series::new("Body Length".into(), body_length).into(),
        Series::new("ASI Eksklusif".into(), asi).into(),
        Series::new("Stunting".into(), stunting).into(),
    ])
    .unwrap()
}

/// Default fixture: 200 rows
pub fn dataset() -> StuntingDataset {
    StuntingDataset::from_frame(synthetic_frame(200, 7)).unwrap()
}

/// The reference child used by end-to-end checks
pub fn reference_input() -> PredictionInput {
    PredictionInput {
        sex: "Female".to_string(),
        age: 24,
        birth_weight: 3.0,
        birth_length: 50.0,
        body_weight: 10.0,
        body_length: 80.0,
        breastfeeding: "Yes".to_string(),
    }
}

/// Write CSV text to a temporary `.csv` file
pub fn csv_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Write rows to the first worksheet of a temporary `.xlsx` workbook.
///
/// Cells that parse as numbers are stored as numbers, empty strings are
/// left blank and everything else is stored as text.
pub fn xlsx_file(rows: &[&[&str]]) -> tempfile::NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".xlsx")
        .tempfile()
        .unwrap();

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(v) => sheet.write_number(r as u32, c as u16, v).unwrap(),
                Err(_) => sheet.write_string(r as u32, c as u16, *cell).unwrap(),
            };
        }
    }
    workbook.save(file.path()).unwrap();
    file
}
