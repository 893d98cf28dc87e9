//! Cross-country consistency tests for bilateral trade reconstruction

use figaro_nam::adapters::FlowStore;
use figaro_nam::core::{exports_of, imports_of, trade_balance, RunSummary};
use figaro_nam::domain::{frame_from_records, CountryCode, FlowRecord};
use polars::prelude::{ChunkAgg, ParquetWriter};
use std::fs::File;
use std::path::Path;
use tempfile::TempDir;

fn import_row(declarant: &str, origin: &str, product: &str, value: f64) -> FlowRecord {
    FlowRecord {
        declarant: declarant.to_string(),
        year: 2019,
        origin: origin.to_string(),
        row_code: format!("CPA_{product}"),
        column_code: "P3_S14".to_string(),
        value,
    }
}

fn seed_partition(root: &Path, country: &str, records: &[FlowRecord]) {
    let dir = root.join("base=2019").join(format!("ctr={country}"));
    std::fs::create_dir_all(&dir).unwrap();
    let mut df = frame_from_records(records).unwrap();
    let file = File::create(dir.join("part-0.parquet")).unwrap();
    ParquetWriter::new(file).finish(&mut df).unwrap();
}

fn codes(codes: &[&str]) -> Vec<CountryCode> {
    codes.iter().map(|c| CountryCode::new(*c).unwrap()).collect()
}

/// On a mutually consistent dataset, DE's balance against FR is the exact
/// negation of FR's balance against DE.
#[test]
fn test_bilateral_balances_are_antisymmetric() {
    let tmp = TempDir::new().unwrap();
    seed_partition(
        tmp.path(),
        "DE",
        &[
            import_row("DE", "FR", "C10-12", 25.0),
            import_row("DE", "FR", "C29", 15.0),
            import_row("DE", "DE", "C29", 900.0),
        ],
    );
    seed_partition(
        tmp.path(),
        "FR",
        &[
            import_row("FR", "DE", "C29", 70.0),
            import_row("FR", "FR", "C10-12", 800.0),
        ],
    );

    let store = FlowStore::open(tmp.path()).unwrap();
    let partners = codes(&["DE", "FR"]);
    let mut summary = RunSummary::new();

    let mut balances = Vec::new();
    for focal in &partners {
        let exports = exports_of(&store, &mut summary, focal, 2019, &partners).unwrap();
        let imports = imports_of(&store, &mut summary, focal, 2019).unwrap();
        balances.push(trade_balance(&exports, &imports).unwrap());
    }

    let de_vs_fr = &balances[0]["FR"];
    let fr_vs_de = &balances[1]["DE"];

    assert!((de_vs_fr.exports - 70.0).abs() < 1e-9);
    assert!((de_vs_fr.imports - 40.0).abs() < 1e-9);
    assert!((de_vs_fr.balance + fr_vs_de.balance).abs() < 1e-9);
    assert!((de_vs_fr.total - fr_vs_de.total).abs() < 1e-9);
}

/// A partner with no partition at all contributes nothing to the export
/// reconstruction but still appears with zero trade when the focal
/// country's own books name it.
#[test]
fn test_absent_partner_means_zero_trade() {
    let tmp = TempDir::new().unwrap();
    seed_partition(tmp.path(), "DE", &[import_row("DE", "CN", "C26", 55.0)]);

    let store = FlowStore::open(tmp.path()).unwrap();
    let de = CountryCode::new("DE").unwrap();
    let partners = codes(&["DE", "CN"]);
    let mut summary = RunSummary::new();

    let exports = exports_of(&store, &mut summary, &de, 2019, &partners).unwrap();
    let imports = imports_of(&store, &mut summary, &de, 2019).unwrap();
    let balances = trade_balance(&exports, &imports).unwrap();

    assert_eq!(exports.height(), 0);
    assert_eq!(summary.partitions_missing, 1);

    let cn = &balances["CN"];
    assert_eq!(cn.exports, 0.0);
    assert!((cn.imports - 55.0).abs() < 1e-9);
    assert!((cn.balance + 55.0).abs() < 1e-9);
}

/// Partner files that rely on the hive path for `ctr`/`base` still feed
/// the export reconstruction.
#[test]
fn test_exports_scan_partner_without_hive_columns() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("base=2019").join("ctr=FR");
    std::fs::create_dir_all(&dir).unwrap();
    let mut payload = polars::prelude::df!(
        "m" => ["DE", "FR"],
        "Set_i" => ["CPA_C29", "CPA_C29"],
        "Set_j" => ["P3_S14", "P3_S14"],
        "value" => [33.0, 400.0],
    )
    .unwrap();
    let file = File::create(dir.join("part-0.parquet")).unwrap();
    ParquetWriter::new(file).finish(&mut payload).unwrap();

    let store = FlowStore::open(tmp.path()).unwrap();
    let de = CountryCode::new("DE").unwrap();
    let mut summary = RunSummary::new();

    let exports = exports_of(&store, &mut summary, &de, 2019, &codes(&["DE", "FR"])).unwrap();
    assert_eq!(exports.height(), 1);
    let total: f64 = exports
        .column("value")
        .unwrap()
        .f64()
        .unwrap()
        .sum()
        .unwrap();
    assert!((total - 33.0).abs() < 1e-9);
}

/// Domestic rows in a partner's books never count as that partner's
/// imports from the focal country.
#[test]
fn test_domestic_rows_excluded_from_both_sides() {
    let tmp = TempDir::new().unwrap();
    seed_partition(
        tmp.path(),
        "AT",
        &[
            import_row("AT", "AT", "C29", 300.0),
            import_row("AT", "DE", "C29", 12.0),
        ],
    );
    seed_partition(tmp.path(), "DE", &[import_row("DE", "DE", "C29", 400.0)]);

    let store = FlowStore::open(tmp.path()).unwrap();
    let de = CountryCode::new("DE").unwrap();
    let partners = codes(&["AT", "DE"]);
    let mut summary = RunSummary::new();

    let exports = exports_of(&store, &mut summary, &de, 2019, &partners).unwrap();
    assert_eq!(exports.height(), 1);

    let imports = imports_of(&store, &mut summary, &de, 2019).unwrap();
    assert_eq!(imports.height(), 0);

    let balances = trade_balance(&exports, &imports).unwrap();
    let at = &balances["AT"];
    assert!((at.exports - 12.0).abs() < 1e-9);
    assert_eq!(at.imports, 0.0);
}
