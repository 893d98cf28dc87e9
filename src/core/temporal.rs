//! Time series construction and growth mathematics
//!
//! Builds per-country series of the standard aggregates across a year
//! range and derives year-over-year change, compound annual growth, trend
//! extrapolation and deviation from trend. Each derived quantity is
//! guarded: undefined results (zero bases, non-positive growth inputs)
//! are `None`, never a NaN or a crash.

use crate::adapters::store::FlowStore;
use crate::core::aggregate::{sum_where, FlowFilter};
use crate::core::summary::RunSummary;
use crate::domain::{CountryCode, Result};
use serde::Serialize;
use tracing::debug;

/// The six standard per-country aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    /// Wages and salaries paid domestically (`Set_i == D11`, domestic)
    Wages,
    /// Operating surplus (`Set_i == B2`, domestic)
    OperatingSurplus,
    /// Household final consumption (`Set_j == P3_S14`, domestic)
    HouseholdConsumption,
    /// Government final consumption (`Set_j == P3_S13`, domestic)
    GovernmentConsumption,
    /// Gross fixed capital formation (`Set_j == P51G`, domestic)
    Investment,
    /// Imported products (`Set_i` starts with `CPA_`, foreign origin)
    Imports,
}

impl Metric {
    /// Stable key used in output tables and JSON.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Wages => "wages_D11",
            Metric::OperatingSurplus => "surplus_B2",
            Metric::HouseholdConsumption => "hh_consumption",
            Metric::GovernmentConsumption => "gov_consumption",
            Metric::Investment => "investment",
            Metric::Imports => "imports",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Wages => "Wages and salaries (D11)",
            Metric::OperatingSurplus => "Operating surplus (B2)",
            Metric::HouseholdConsumption => "Household consumption (P3_S14)",
            Metric::GovernmentConsumption => "Government consumption (P3_S13)",
            Metric::Investment => "Investment (P51G)",
            Metric::Imports => "Imports (CPA_*)",
        }
    }

    /// Row filter selecting the flows of this metric.
    pub fn filter(&self) -> FlowFilter {
        match self {
            Metric::Wages => FlowFilter::row_code("D11").domestic(true),
            Metric::OperatingSurplus => FlowFilter::row_code("B2").domestic(true),
            Metric::HouseholdConsumption => FlowFilter::column_code("P3_S14").domestic(true),
            Metric::GovernmentConsumption => FlowFilter::column_code("P3_S13").domestic(true),
            Metric::Investment => FlowFilter::column_code("P51G").domestic(true),
            Metric::Imports => FlowFilter::default().with_row_prefix("CPA_").domestic(false),
        }
    }

    /// All metrics, in report order.
    pub fn all() -> &'static [Metric] {
        &[
            Metric::Wages,
            Metric::OperatingSurplus,
            Metric::HouseholdConsumption,
            Metric::GovernmentConsumption,
            Metric::Investment,
            Metric::Imports,
        ]
    }
}

/// One aggregate tracked across a year range for one country.
///
/// `values` is parallel to `years`; a year whose partition is absent
/// contributes 0.0 and is flagged in `missing`, keeping "no data" and
/// "legitimately zero" distinguishable downstream.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeries {
    pub country: CountryCode,
    pub key: String,
    pub years: Vec<i32>,
    pub values: Vec<f64>,
    pub missing: Vec<bool>,
}

impl TimeSeries {
    /// Value for one year, if it is inside the series range.
    pub fn value_for(&self, year: i32) -> Option<f64> {
        self.years
            .iter()
            .position(|&y| y == year)
            .map(|i| self.values[i])
    }

    /// Year-over-year percentage changes, parallel to `years`.
    pub fn yoy(&self) -> Vec<Option<f64>> {
        yoy_change(&self.values)
    }

}

/// Builds one series per component for one country, loading each year's
/// partition once and applying every component filter to it.
pub fn build_series(
    store: &FlowStore,
    summary: &mut RunSummary,
    country: &CountryCode,
    years: &[i32],
    components: &[(String, FlowFilter)],
) -> Result<Vec<TimeSeries>> {
    let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(years.len()); components.len()];
    let mut missing: Vec<bool> = Vec::with_capacity(years.len());

    for &year in years {
        match store.try_load(country, year)? {
            Some(df) => {
                summary.record_partition_read();
                missing.push(false);
                for (i, (key, filter)) in components.iter().enumerate() {
                    let sum = sum_where(&df, filter)?;
                    if sum == 0.0 {
                        debug!(country = %country, year, key = %key, "Aggregate matched no rows");
                        summary.record_zero_aggregate();
                    }
                    values[i].push(sum);
                }
            }
            None => {
                summary.record_partition_missing();
                missing.push(true);
                for series in values.iter_mut() {
                    series.push(0.0);
                }
            }
        }
    }

    Ok(components
        .iter()
        .zip(values)
        .map(|((key, _), values)| TimeSeries {
            country: country.clone(),
            key: key.clone(),
            years: years.to_vec(),
            values,
            missing: missing.clone(),
        })
        .collect())
}

/// The standard metric components, ready for [`build_series`].
pub fn metric_components() -> Vec<(String, FlowFilter)> {
    Metric::all()
        .iter()
        .map(|m| (m.key().to_string(), m.filter()))
        .collect()
}

/// Percentage change from `prev` to `curr`; `None` when `prev` is zero.
pub fn pct_change(prev: f64, curr: f64) -> Option<f64> {
    if prev == 0.0 {
        None
    } else {
        Some((curr - prev) / prev * 100.0)
    }
}

/// Year-over-year percentage change per entry. The first entry is `None`
/// (no prior year); a zero prior value yields `None`.
pub fn yoy_change(values: &[f64]) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(values.len());
    for (i, &value) in values.iter().enumerate() {
        if i == 0 {
            changes.push(None);
        } else {
            changes.push(pct_change(values[i - 1], value));
        }
    }
    changes
}

/// Compound annual growth rate between two values, as a fraction.
///
/// `None` when either value is non-positive or the span is zero; the
/// geometric rate is undefined there.
pub fn cagr(v_start: f64, v_end: f64, n_years: i32) -> Option<f64> {
    if v_start <= 0.0 || v_end <= 0.0 || n_years <= 0 {
        return None;
    }
    Some((v_end / v_start).powf(1.0 / f64::from(n_years)) - 1.0)
}

/// Extrapolates a base value forward at a compound rate.
pub fn trend_extrapolate(v_base: f64, rate: Option<f64>, n_years_forward: i32) -> Option<f64> {
    let rate = rate?;
    Some(v_base * (1.0 + rate).powi(n_years_forward))
}

/// Percentage deviation of an actual value from its trend value.
/// `None` when the trend is undefined or non-positive.
pub fn deviation_from_trend(actual: f64, trend: Option<f64>) -> Option<f64> {
    let trend = trend?;
    if trend <= 0.0 {
        return None;
    }
    Some((actual - trend) / trend * 100.0)
}

/// Pearson correlation coefficient of two equal-length samples.
///
/// `None` when the samples are shorter than two points, of unequal
/// length, or either side has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{frame_from_records, FlowRecord};
    use polars::prelude::ParquetWriter;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_metric_filters() {
        assert_eq!(Metric::Wages.filter(), FlowFilter::row_code("D11").domestic(true));
        assert_eq!(
            Metric::Imports.filter(),
            FlowFilter::default().with_row_prefix("CPA_").domestic(false)
        );
        assert_eq!(Metric::all().len(), 6);
    }

    #[test]
    fn test_pct_change() {
        assert_eq!(pct_change(100.0, 110.0), Some(10.0));
        assert_eq!(pct_change(0.0, 50.0), None);
        let down = pct_change(200.0, 150.0).unwrap();
        assert!((down - (-25.0)).abs() < 1e-9);
    }

    #[test]
    fn test_yoy_change() {
        let changes = yoy_change(&[100.0, 110.0, 0.0, 55.0]);
        assert_eq!(changes[0], None);
        assert!((changes[1].unwrap() - 10.0).abs() < 1e-9);
        assert!((changes[2].unwrap() - (-100.0)).abs() < 1e-9);
        assert_eq!(changes[3], None);
    }

    #[test]
    fn test_cagr_flat_is_zero() {
        let rate = cagr(100.0, 100.0, 8).unwrap();
        assert!(rate.abs() < 1e-12);
    }

    #[test]
    fn test_cagr_known_value() {
        // Doubling over one year is 100% growth
        let rate = cagr(50.0, 100.0, 1).unwrap();
        assert!((rate - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cagr_undefined() {
        assert_eq!(cagr(0.0, 100.0, 5), None);
        assert_eq!(cagr(100.0, -1.0, 5), None);
        assert_eq!(cagr(100.0, 100.0, 0), None);
    }

    #[test]
    fn test_trend_extrapolation_roundtrip() {
        let rate = cagr(100.0, 200.0, 4);
        let trend = trend_extrapolate(100.0, rate, 4).unwrap();
        assert!((trend - 200.0).abs() < 1e-9);
        assert_eq!(trend_extrapolate(100.0, None, 4), None);
    }

    #[test]
    fn test_deviation_from_trend() {
        let dev = deviation_from_trend(90.0, Some(100.0)).unwrap();
        assert!((dev - (-10.0)).abs() < 1e-9);
        assert_eq!(deviation_from_trend(90.0, None), None);
        assert_eq!(deviation_from_trend(90.0, Some(0.0)), None);
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        let r = pearson(&xs, &ys).unwrap();
        assert!((r - 1.0).abs() < 1e-12);

        let inverse = [8.0, 6.0, 4.0, 2.0];
        let r = pearson(&xs, &inverse).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_undefined() {
        assert_eq!(pearson(&[1.0], &[2.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[3.0]), None);
        assert_eq!(pearson(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]), None);
    }

    fn seed_partition(root: &std::path::Path, country: &str, year: i32, wages: f64) {
        let dir = root
            .join(format!("base={year}"))
            .join(format!("ctr={country}"));
        std::fs::create_dir_all(&dir).unwrap();
        let mut df = frame_from_records(&[FlowRecord {
            declarant: country.to_string(),
            year,
            origin: country.to_string(),
            row_code: "D11".to_string(),
            column_code: "C29".to_string(),
            value: wages,
        }])
        .unwrap();
        let file = File::create(dir.join("part-0.parquet")).unwrap();
        ParquetWriter::new(file).finish(&mut df).unwrap();
    }

    #[test]
    fn test_build_series_with_gap() {
        let tmp = TempDir::new().unwrap();
        seed_partition(tmp.path(), "FR", 2019, 100.0);
        seed_partition(tmp.path(), "FR", 2021, 120.0);

        let store = FlowStore::open(tmp.path()).unwrap();
        let fr = CountryCode::new("FR").unwrap();
        let mut summary = RunSummary::new();
        let series = build_series(
            &store,
            &mut summary,
            &fr,
            &[2019, 2020, 2021],
            &[("wages_D11".to_string(), Metric::Wages.filter())],
        )
        .unwrap();

        assert_eq!(series.len(), 1);
        let wages = &series[0];
        assert_eq!(wages.values, vec![100.0, 0.0, 120.0]);
        assert_eq!(wages.missing, vec![false, true, false]);
        assert_eq!(summary.partitions_missing, 1);
        assert_eq!(summary.partitions_read, 2);

        // 2020 gap makes both surrounding changes undefined
        let yoy = wages.yoy();
        assert_eq!(yoy[0], None);
        assert!((yoy[1].unwrap() + 100.0).abs() < 1e-9);
        assert_eq!(yoy[2], None);
    }
}
