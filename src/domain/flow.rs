//! Flow record model and dataframe schema
//!
//! One flow record is a single transaction value linking a row
//! classification (`Set_i`) to a column classification (`Set_j`),
//! attributed to an origin partner (`m`) inside the accounts of a
//! declaring country (`ctr`) for a base year (`base`).
//!
//! Rows for the same `(Set_i, Set_j)` pair are additive; negative values
//! are valid (tax/subsidy netting, inventory drawdown).

use crate::domain::result::Result;
use polars::prelude::*;

/// Column names of the flow table, matching the upstream parquet schema.
pub mod columns {
    /// Declaring country: the country whose accounts register the flow.
    pub const DECLARANT: &str = "ctr";
    /// Base year of the accounts.
    pub const YEAR: &str = "base";
    /// Origin partner of the flow. Domestic flows have `m == ctr`.
    pub const ORIGIN: &str = "m";
    /// Row classification ("from" side): product, transaction or balancing code.
    pub const ROW_CODE: &str = "Set_i";
    /// Column classification ("to" side): industry, sector or final-use code.
    pub const COL_CODE: &str = "Set_j";
    /// Flow value in million EUR, nominal. Signed.
    pub const VALUE: &str = "value";
    /// Destination tag added by the bilateral reconciler, not stored upstream.
    pub const DESTINATION: &str = "destination";
}

/// A single flow record, used for in-memory frame construction and tests.
///
/// Bulk data stays in dataframes; this struct is the row-level view.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRecord {
    pub declarant: String,
    pub year: i32,
    pub origin: String,
    pub row_code: String,
    pub column_code: String,
    pub value: f64,
}

impl FlowRecord {
    /// True when the flow is registered by the same country it originates from.
    pub fn is_domestic(&self) -> bool {
        self.origin == self.declarant
    }
}

/// Builds a flow dataframe from records, in schema column order.
pub fn frame_from_records(records: &[FlowRecord]) -> Result<DataFrame> {
    let declarant: Vec<&str> = records.iter().map(|r| r.declarant.as_str()).collect();
    let year: Vec<i32> = records.iter().map(|r| r.year).collect();
    let origin: Vec<&str> = records.iter().map(|r| r.origin.as_str()).collect();
    let row_code: Vec<&str> = records.iter().map(|r| r.row_code.as_str()).collect();
    let col_code: Vec<&str> = records.iter().map(|r| r.column_code.as_str()).collect();
    let value: Vec<f64> = records.iter().map(|r| r.value).collect();

    let df = df!(
        columns::DECLARANT => declarant,
        columns::YEAR => year,
        columns::ORIGIN => origin,
        columns::ROW_CODE => row_code,
        columns::COL_CODE => col_code,
        columns::VALUE => value,
    )?;
    Ok(df)
}

/// Returns an empty frame with the full flow schema.
///
/// Used by the store when a partition is missing, so downstream
/// aggregation always sees the same columns.
pub fn empty_frame() -> DataFrame {
    DataFrame::new(vec![
        Series::new_empty(columns::DECLARANT, &DataType::String),
        Series::new_empty(columns::YEAR, &DataType::Int32),
        Series::new_empty(columns::ORIGIN, &DataType::String),
        Series::new_empty(columns::ROW_CODE, &DataType::String),
        Series::new_empty(columns::COL_CODE, &DataType::String),
        Series::new_empty(columns::VALUE, &DataType::Float64),
    ])
    .expect("static schema is always valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(origin: &str, row: &str, col: &str, value: f64) -> FlowRecord {
        FlowRecord {
            declarant: "DE".to_string(),
            year: 2019,
            origin: origin.to_string(),
            row_code: row.to_string(),
            column_code: col.to_string(),
            value,
        }
    }

    #[test]
    fn test_is_domestic() {
        assert!(record("DE", "D11", "C29", 100.0).is_domestic());
        assert!(!record("FR", "CPA_C29", "C29", 50.0).is_domestic());
    }

    #[test]
    fn test_frame_from_records() {
        let df = frame_from_records(&[
            record("DE", "D11", "C29", 100.0),
            record("FR", "CPA_C20", "C20", -3.5),
        ])
        .unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            df.get_column_names(),
            vec!["ctr", "base", "m", "Set_i", "Set_j", "value"]
        );
        let total: f64 = df.column("value").unwrap().f64().unwrap().sum().unwrap();
        assert!((total - 96.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_frame_schema() {
        let df = empty_frame();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 6);
        assert_eq!(
            df.column("value").unwrap().dtype(),
            &DataType::Float64
        );
    }
}
