//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a small raw examination table with known characteristics
///
/// - patients 1-5 have `cardio = 0`, patients 6-10 `cardio = 1`
/// - patient 4 has `ap_lo > ap_hi` (inconsistent blood pressure)
/// - patient 9 is extremely tall and patient 10 extremely heavy
/// - BMI > 25 for patients 2, 7, 8 and 10
pub fn create_patient_dataframe() -> DataFrame {
    df! {
        "id" => [1i64, 2, 3, 4, 5, 6, 7, 8, 9, 10],
        "age" => [18393i64, 20228, 18857, 17623, 17474, 21914, 22113, 22584, 17668, 19834],
        "gender" => [2i64, 1, 1, 2, 1, 1, 1, 2, 1, 1],
        "height" => [168i64, 156, 165, 169, 156, 151, 157, 178, 210, 164],
        "weight" => [62.0f64, 85.0, 64.0, 62.0, 56.0, 56.0, 93.0, 95.0, 71.0, 150.0],
        "ap_hi" => [110i64, 140, 130, 80, 100, 120, 130, 130, 110, 150],
        "ap_lo" => [80i64, 90, 70, 150, 60, 80, 80, 90, 70, 100],
        "cholesterol" => [1i64, 3, 3, 1, 1, 2, 3, 3, 1, 1],
        "gluc" => [1i64, 1, 1, 1, 1, 2, 1, 3, 1, 1],
        "smoke" => [0i64, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        "alco" => [0i64, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        "active" => [1i64, 1, 0, 1, 0, 0, 1, 1, 1, 0],
        "cardio" => [0i64, 0, 0, 0, 0, 1, 1, 1, 1, 1],
    }
    .unwrap()
}

/// Create a random but plausible examination table
pub fn create_random_patients(rows: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let id: Vec<i64> = (0..rows as i64).collect();
    let age: Vec<i64> = (0..rows).map(|_| rng.gen_range(10_000..24_000)).collect();
    let gender: Vec<i64> = (0..rows).map(|_| rng.gen_range(1..=2)).collect();
    let height: Vec<i64> = (0..rows).map(|_| rng.gen_range(140..200)).collect();
    let weight: Vec<f64> = (0..rows)
        .map(|_| (rng.gen_range(40.0..130.0f64) * 10.0).round() / 10.0)
        .collect();
    let ap_hi: Vec<i64> = (0..rows).map(|_| rng.gen_range(90..180)).collect();
    let ap_lo: Vec<i64> = (0..rows).map(|_| rng.gen_range(50..120)).collect();
    let cholesterol: Vec<i64> = (0..rows).map(|_| rng.gen_range(1..=3)).collect();
    let gluc: Vec<i64> = (0..rows).map(|_| rng.gen_range(1..=3)).collect();
    let smoke: Vec<i64> = (0..rows).map(|_| rng.gen_range(0..=1)).collect();
    let alco: Vec<i64> = (0..rows).map(|_| rng.gen_range(0..=1)).collect();
    let active: Vec<i64> = (0..rows).map(|_| rng.gen_range(0..=1)).collect();
    let cardio: Vec<i64> = (0..rows).map(|_| rng.gen_range(0..=1)).collect();

    DataFrame::new(vec![
        Column::new("id".into(), id),
        Column::new("age".into(), age),
        Column::new("gender".into(), gender),
        Column::new("height".into(), height),
        Column::new("weight".into(), weight),
        Column::new("ap_hi".into(), ap_hi),
        Column::new("ap_lo".into(), ap_lo),
        Column::new("cholesterol".into(), cholesterol),
        Column::new("gluc".into(), gluc),
        Column::new("smoke".into(), smoke),
        Column::new("alco".into(), alco),
        Column::new("active".into(), active),
        Column::new("cardio".into(), cardio),
    ])
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("medical_examination.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("medical_examination.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Read an integer column as `i64` values
pub fn i64_values(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect()
}

/// Read a numeric column as `f64` values
pub fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}
