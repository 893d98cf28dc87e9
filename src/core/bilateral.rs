//! Bilateral trade reconstruction
//!
//! The row schema has no export code: a country's exports are visible
//! only as import rows in its partners' books. The reconciler scans every
//! partner partition for rows attributed to the focal country and tags
//! them with the partner as destination. Trade balances then pair the
//! reconstructed exports with the focal country's own import rows.

use crate::adapters::store::FlowStore;
use crate::core::aggregate::{group_sum, FlowFilter};
use crate::core::summary::RunSummary;
use crate::domain::flow::columns;
use crate::domain::{empty_frame, CountryCode, Result};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Empty export frame: flow schema plus the destination column.
fn empty_export_frame() -> Result<DataFrame> {
    let mut df = empty_frame();
    df.with_column(Series::new_empty(columns::DESTINATION, &DataType::String))?;
    Ok(df)
}

/// Reconstructs the focal country's exports for one year by scanning the
/// partner universe.
///
/// Each partner's partition is searched for rows whose origin is the
/// focal country; kept rows are tagged with the partner as destination
/// and concatenated. Missing partner partitions mean no observed trade
/// and are skipped.
pub fn exports_of(
    store: &FlowStore,
    summary: &mut RunSummary,
    focal: &CountryCode,
    year: i32,
    partners: &[CountryCode],
) -> Result<DataFrame> {
    let mut combined = empty_export_frame()?;

    for partner in partners {
        if partner == focal {
            continue;
        }
        let Some(df) = store.try_load(partner, year)? else {
            summary.record_partition_missing();
            continue;
        };
        summary.record_partition_read();

        let kept = df
            .lazy()
            .filter(col(columns::ORIGIN).eq(lit(focal.as_str())))
            .with_column(lit(partner.as_str()).alias(columns::DESTINATION))
            .collect()?;
        if kept.height() > 0 {
            combined = combined.vstack(&kept)?;
        }
    }

    debug!(focal = %focal, year, rows = combined.height(), "Exports reconstructed");
    Ok(combined)
}

/// The focal country's import rows for one year: product rows with a
/// foreign origin, straight from its own partition.
pub fn imports_of(
    store: &FlowStore,
    summary: &mut RunSummary,
    focal: &CountryCode,
    year: i32,
) -> Result<DataFrame> {
    let Some(df) = store.try_load(focal, year)? else {
        summary.record_partition_missing();
        return Ok(empty_frame());
    };
    summary.record_partition_read();

    let imports = df
        .lazy()
        .filter(
            col(columns::ROW_CODE)
                .str()
                .starts_with(lit("CPA_"))
                .and(col(columns::ORIGIN).neq(col(columns::DECLARANT))),
        )
        .collect()?;
    Ok(imports)
}

/// Bilateral position against one partner, million EUR nominal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeBalance {
    pub exports: f64,
    pub imports: f64,
    /// `exports - imports`
    pub balance: f64,
    /// `exports + imports`
    pub total: f64,
}

/// Pairs reconstructed exports with import rows, keyed by partner.
///
/// A partner present on only one side gets 0.0 for the other: no
/// recorded flow is zero trade, not unknown trade.
pub fn trade_balance(
    exports: &DataFrame,
    imports: &DataFrame,
) -> Result<BTreeMap<String, TradeBalance>> {
    let exports_by_partner = group_sum(exports, columns::DESTINATION, &FlowFilter::default())?;
    let imports_by_partner = group_sum(imports, columns::ORIGIN, &FlowFilter::default())?;

    let mut balances: BTreeMap<String, TradeBalance> = BTreeMap::new();
    for (partner, value) in exports_by_partner {
        balances
            .entry(partner)
            .or_insert(TradeBalance {
                exports: 0.0,
                imports: 0.0,
                balance: 0.0,
                total: 0.0,
            })
            .exports = value;
    }
    for (partner, value) in imports_by_partner {
        balances
            .entry(partner)
            .or_insert(TradeBalance {
                exports: 0.0,
                imports: 0.0,
                balance: 0.0,
                total: 0.0,
            })
            .imports = value;
    }
    for balance in balances.values_mut() {
        balance.balance = balance.exports - balance.imports;
        balance.total = balance.exports + balance.imports;
    }
    Ok(balances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{frame_from_records, FlowRecord};
    use std::fs::File;
    use tempfile::TempDir;

    fn seed_partition(root: &std::path::Path, country: &str, year: i32, records: &[FlowRecord]) {
        let dir = root
            .join(format!("base={year}"))
            .join(format!("ctr={country}"));
        std::fs::create_dir_all(&dir).unwrap();
        let mut df = frame_from_records(records).unwrap();
        let file = File::create(dir.join("part-0.parquet")).unwrap();
        ParquetWriter::new(file).finish(&mut df).unwrap();
    }

    fn product_row(declarant: &str, origin: &str, value: f64) -> FlowRecord {
        FlowRecord {
            declarant: declarant.to_string(),
            year: 2019,
            origin: origin.to_string(),
            row_code: "CPA_C29".to_string(),
            column_code: "C29".to_string(),
            value,
        }
    }

    fn codes(codes: &[&str]) -> Vec<CountryCode> {
        codes.iter().map(|c| CountryCode::new(*c).unwrap()).collect()
    }

    #[test]
    fn test_exports_scanned_from_partner_books() {
        let tmp = TempDir::new().unwrap();
        // FR records 30 of German product imports, AT records 20
        seed_partition(
            tmp.path(),
            "FR",
            2019,
            &[product_row("FR", "DE", 30.0), product_row("FR", "FR", 99.0)],
        );
        seed_partition(tmp.path(), "AT", 2019, &[product_row("AT", "DE", 20.0)]);

        let store = FlowStore::open(tmp.path()).unwrap();
        let de = CountryCode::new("DE").unwrap();
        let mut summary = RunSummary::new();
        let partners = codes(&["FR", "AT", "IT", "DE"]);

        let exports = exports_of(&store, &mut summary, &de, 2019, &partners).unwrap();
        assert_eq!(exports.height(), 2);
        let total: f64 = exports
            .column("value")
            .unwrap()
            .f64()
            .unwrap()
            .sum()
            .unwrap();
        assert!((total - 50.0).abs() < 1e-9);

        // IT partition absent, DE skipped as the focal country
        assert_eq!(summary.partitions_missing, 1);
        assert_eq!(summary.partitions_read, 2);

        let destinations = exports.column("destination").unwrap();
        assert_eq!(destinations.str().unwrap().get(0), Some("FR"));
    }

    #[test]
    fn test_imports_keep_foreign_product_rows_only() {
        let tmp = TempDir::new().unwrap();
        seed_partition(
            tmp.path(),
            "DE",
            2019,
            &[
                product_row("DE", "FR", 40.0),
                product_row("DE", "DE", 500.0),
                FlowRecord {
                    declarant: "DE".to_string(),
                    year: 2019,
                    origin: "FR".to_string(),
                    row_code: "D11".to_string(),
                    column_code: "C29".to_string(),
                    value: 7.0,
                },
            ],
        );

        let store = FlowStore::open(tmp.path()).unwrap();
        let de = CountryCode::new("DE").unwrap();
        let mut summary = RunSummary::new();
        let imports = imports_of(&store, &mut summary, &de, 2019).unwrap();
        assert_eq!(imports.height(), 1);
        let total: f64 = imports
            .column("value")
            .unwrap()
            .f64()
            .unwrap()
            .sum()
            .unwrap();
        assert!((total - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_trade_balance_one_sided_partner_is_zero() {
        let tmp = TempDir::new().unwrap();
        // FR imports 30 from DE; DE imports 10 from FR and 5 from IT
        seed_partition(tmp.path(), "FR", 2019, &[product_row("FR", "DE", 30.0)]);
        seed_partition(
            tmp.path(),
            "DE",
            2019,
            &[product_row("DE", "FR", 10.0), product_row("DE", "IT", 5.0)],
        );

        let store = FlowStore::open(tmp.path()).unwrap();
        let de = CountryCode::new("DE").unwrap();
        let mut summary = RunSummary::new();
        let partners = codes(&["FR", "IT"]);

        let exports = exports_of(&store, &mut summary, &de, 2019, &partners).unwrap();
        let imports = imports_of(&store, &mut summary, &de, 2019).unwrap();
        let balances = trade_balance(&exports, &imports).unwrap();

        let fr = &balances["FR"];
        assert!((fr.exports - 30.0).abs() < 1e-9);
        assert!((fr.imports - 10.0).abs() < 1e-9);
        assert!((fr.balance - 20.0).abs() < 1e-9);
        assert!((fr.total - 40.0).abs() < 1e-9);

        // IT never recorded German imports: exports side is zero
        let it = &balances["IT"];
        assert_eq!(it.exports, 0.0);
        assert!((it.imports - 5.0).abs() < 1e-9);
        assert!((it.balance + 5.0).abs() < 1e-9);
    }
}
