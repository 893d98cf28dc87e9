//! Integration tests for the partitioned flow store

use figaro_nam::adapters::FlowStore;
use figaro_nam::domain::flow::columns;
use figaro_nam::domain::CountryCode;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tempfile::TempDir;

fn write_partition(root: &Path, country: &str, year: i32, mut df: DataFrame) {
    let dir = root
        .join(format!("base={year}"))
        .join(format!("ctr={country}"));
    std::fs::create_dir_all(&dir).unwrap();
    let file = File::create(dir.join("part-0.parquet")).unwrap();
    ParquetWriter::new(file).finish(&mut df).unwrap();
}

fn country(code: &str) -> CountryCode {
    CountryCode::new(code).unwrap()
}

#[test]
fn test_partition_columns_reconstructed_from_path() {
    // Hive layouts keep ctr/base in directory names; the file itself
    // only carries the payload columns here.
    let tmp = TempDir::new().unwrap();
    let payload = df!(
        "m" => ["DE", "FR"],
        "Set_i" => ["D11", "CPA_C29"],
        "Set_j" => ["C29", "C29"],
        "value" => [100.0, 25.0],
    )
    .unwrap();
    write_partition(tmp.path(), "DE", 2019, payload);

    let store = FlowStore::open(tmp.path()).unwrap();
    let df = store.load(&country("DE"), 2019).unwrap();

    assert_eq!(df.height(), 2);
    // Reconstructed columns land in schema order, not appended at the end
    assert_eq!(
        df.get_column_names(),
        vec!["ctr", "base", "m", "Set_i", "Set_j", "value"]
    );
    let declarants = df.column(columns::DECLARANT).unwrap().str().unwrap();
    assert_eq!(declarants.get(0), Some("DE"));
    assert_eq!(declarants.get(1), Some("DE"));
    let years = df.column(columns::YEAR).unwrap().i32().unwrap();
    assert_eq!(years.get(0), Some(2019));
}

#[test]
fn test_integer_values_cast_to_f64() {
    let tmp = TempDir::new().unwrap();
    let payload = df!(
        "m" => ["DE"],
        "Set_i" => ["D11"],
        "Set_j" => ["C29"],
        "value" => [42i64],
    )
    .unwrap();
    write_partition(tmp.path(), "DE", 2019, payload);

    let store = FlowStore::open(tmp.path()).unwrap();
    let df = store.load(&country("DE"), 2019).unwrap();
    assert_eq!(df.column(columns::VALUE).unwrap().dtype(), &DataType::Float64);
    let value = df.column(columns::VALUE).unwrap().f64().unwrap().get(0);
    assert_eq!(value, Some(42.0));
}

#[test]
fn test_missing_partition_yields_empty_schema_frame() {
    let tmp = TempDir::new().unwrap();
    let store = FlowStore::open(tmp.path()).unwrap();

    let df = store.load(&country("FR"), 2021).unwrap();
    assert_eq!(df.height(), 0);
    // Schema intact: downstream aggregation never branches on presence
    for name in ["ctr", "base", "m", "Set_i", "Set_j", "value"] {
        assert!(df.column(name).is_ok(), "missing column {name}");
    }
}

#[test]
fn test_load_all_stacks_every_partition() {
    let tmp = TempDir::new().unwrap();
    for (ctr, year, value) in [("DE", 2019, 1.0), ("FR", 2019, 2.0), ("DE", 2020, 3.0)] {
        let payload = df!(
            "m" => [ctr],
            "Set_i" => ["D11"],
            "Set_j" => ["C29"],
            "value" => [value],
        )
        .unwrap();
        write_partition(tmp.path(), ctr, year, payload);
    }

    let store = FlowStore::open(tmp.path()).unwrap();
    let all = store.load_all().unwrap();
    assert_eq!(all.height(), 3);
    let total: f64 = all.column("value").unwrap().f64().unwrap().sum().unwrap();
    assert!((total - 6.0).abs() < 1e-9);
}

#[test]
fn test_payload_only_partitions_stack_with_full_ones() {
    let tmp = TempDir::new().unwrap();
    // FR carries the hive columns in the file, DE does not
    let full = df!(
        "ctr" => ["FR"],
        "base" => [2019i32],
        "m" => ["FR"],
        "Set_i" => ["D11"],
        "Set_j" => ["C29"],
        "value" => [5.0],
    )
    .unwrap();
    write_partition(tmp.path(), "FR", 2019, full);
    let payload = df!(
        "m" => ["DE"],
        "Set_i" => ["D11"],
        "Set_j" => ["C29"],
        "value" => [7.0],
    )
    .unwrap();
    write_partition(tmp.path(), "DE", 2019, payload);

    let store = FlowStore::open(tmp.path()).unwrap();
    let all = store.load_all().unwrap();
    assert_eq!(all.height(), 2);
    let total: f64 = all.column("value").unwrap().f64().unwrap().sum().unwrap();
    assert!((total - 12.0).abs() < 1e-9);
}

#[test]
fn test_open_rejects_missing_root() {
    assert!(FlowStore::open("/definitely/not/a/real/path").is_err());
}
