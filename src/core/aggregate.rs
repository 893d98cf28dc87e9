//! Flow aggregation primitives
//!
//! Every analysis command reduces flow frames through the same small set
//! of operations: filter by codes and origin, sum values, or group and
//! sum. Sums over empty or fully filtered frames are 0.0, never an error,
//! matching the additivity of the accounts.

use crate::core::classify::{classify, CodeCategory};
use crate::domain::flow::columns;
use crate::domain::result::Result;
use polars::prelude::*;
use std::collections::BTreeMap;

/// Predicate over flow rows. Unset fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowFilter {
    /// Exact `Set_i` match
    pub row_code: Option<String>,
    /// Exact `Set_j` match
    pub column_code: Option<String>,
    /// `Set_i` prefix match (e.g. `CPA_` for product rows)
    pub row_prefix: Option<String>,
    /// Origin constraint: `Some(true)` domestic only (`m == ctr`),
    /// `Some(false)` foreign only
    pub domestic: Option<bool>,
}

impl FlowFilter {
    pub fn row_code(code: &str) -> Self {
        Self {
            row_code: Some(code.to_string()),
            ..Default::default()
        }
    }

    pub fn column_code(code: &str) -> Self {
        Self {
            column_code: Some(code.to_string()),
            ..Default::default()
        }
    }

    pub fn domestic(mut self, domestic: bool) -> Self {
        self.domestic = Some(domestic);
        self
    }

    pub fn with_row_prefix(mut self, prefix: &str) -> Self {
        self.row_prefix = Some(prefix.to_string());
        self
    }

    /// Lowers the filter to a polars expression.
    fn to_expr(&self) -> Expr {
        let mut expr = lit(true);
        if let Some(ref code) = self.row_code {
            expr = expr.and(col(columns::ROW_CODE).eq(lit(code.clone())));
        }
        if let Some(ref code) = self.column_code {
            expr = expr.and(col(columns::COL_CODE).eq(lit(code.clone())));
        }
        if let Some(ref prefix) = self.row_prefix {
            expr = expr.and(
                col(columns::ROW_CODE)
                    .str()
                    .starts_with(lit(prefix.clone())),
            );
        }
        match self.domestic {
            Some(true) => expr = expr.and(col(columns::ORIGIN).eq(col(columns::DECLARANT))),
            Some(false) => expr = expr.and(col(columns::ORIGIN).neq(col(columns::DECLARANT))),
            None => {}
        }
        expr
    }
}

/// Sums `value` over the rows matching the filter. Empty input sums to 0.0.
pub fn sum_where(df: &DataFrame, filter: &FlowFilter) -> Result<f64> {
    if df.height() == 0 {
        return Ok(0.0);
    }
    let out = df
        .clone()
        .lazy()
        .filter(filter.to_expr())
        .select([col(columns::VALUE).sum()])
        .collect()?;
    Ok(out
        .column(columns::VALUE)?
        .f64()?
        .get(0)
        .unwrap_or(0.0))
}

/// Groups matching rows by one column and sums `value` per group,
/// descending by sum.
pub fn group_sum(df: &DataFrame, group: &str, filter: &FlowFilter) -> Result<Vec<(String, f64)>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }
    let out = df
        .clone()
        .lazy()
        .filter(filter.to_expr())
        .group_by([col(group)])
        .agg([col(columns::VALUE).sum()])
        .collect()?;

    let keys = out.column(group)?.str()?;
    let sums = out.column(columns::VALUE)?.f64()?;
    let mut pairs: Vec<(String, f64)> = keys
        .into_iter()
        .zip(sums)
        .filter_map(|(k, v)| Some((k?.to_string(), v?)))
        .collect();
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(pairs)
}

/// Groups matching rows by the `(Set_i, Set_j)` pair and sums `value`,
/// descending by sum.
pub fn group_sum_pairs(df: &DataFrame, filter: &FlowFilter) -> Result<Vec<(String, String, f64)>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }
    let out = df
        .clone()
        .lazy()
        .filter(filter.to_expr())
        .group_by([col(columns::ROW_CODE), col(columns::COL_CODE)])
        .agg([col(columns::VALUE).sum()])
        .collect()?;

    let rows = out.column(columns::ROW_CODE)?.str()?;
    let cols = out.column(columns::COL_CODE)?.str()?;
    let sums = out.column(columns::VALUE)?.f64()?;
    let mut triples: Vec<(String, String, f64)> = (0..out.height())
        .filter_map(|i| {
            Some((
                rows.get(i)?.to_string(),
                cols.get(i)?.to_string(),
                sums.get(i)?,
            ))
        })
        .collect();
    triples.sort_by(|a, b| b.2.total_cmp(&a.2));
    Ok(triples)
}

/// Five-number summary of the value column with IQR outlier counts.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDistribution {
    pub count: usize,
    pub negatives: usize,
    pub negative_sum: f64,
    pub sum: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Values below `q1 - 1.5 * IQR`
    pub outliers_low: usize,
    /// Values above `q3 + 1.5 * IQR`
    pub outliers_high: usize,
}

/// Linear-interpolated quantile of a sorted sample.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Computes the distribution of the `value` column. `None` for an empty
/// frame; quantiles are undefined there.
pub fn value_distribution(df: &DataFrame) -> Result<Option<ValueDistribution>> {
    if df.height() == 0 {
        return Ok(None);
    }
    let values = df.column(columns::VALUE)?.f64()?;
    let mut sorted: Vec<f64> = values.into_iter().flatten().collect();
    if sorted.is_empty() {
        return Ok(None);
    }
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let sum: f64 = sorted.iter().sum();
    let negatives = sorted.iter().take_while(|v| **v < 0.0).count();
    let negative_sum: f64 = sorted.iter().take(negatives).sum();
    let q1 = quantile_sorted(&sorted, 0.25);
    let median = quantile_sorted(&sorted, 0.5);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    Ok(Some(ValueDistribution {
        count,
        negatives,
        negative_sum,
        sum,
        min: sorted[0],
        q1,
        median,
        q3,
        max: sorted[count - 1],
        outliers_low: sorted.iter().take_while(|v| **v < low_fence).count(),
        outliers_high: sorted.iter().rev().take_while(|v| **v > high_fence).count(),
    }))
}

/// Per-category count and value sum for one code column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStat {
    pub category: CodeCategory,
    pub count: u64,
    pub sum: f64,
}

/// Classifies every code in a column and tallies count and value sum per
/// category. Categories with no rows are omitted.
pub fn category_sums(df: &DataFrame, code_column: &str) -> Result<Vec<CategoryStat>> {
    let mut tally: BTreeMap<CodeCategory, (u64, f64)> = BTreeMap::new();
    if df.height() > 0 {
        let codes = df.column(code_column)?.str()?;
        let values = df.column(columns::VALUE)?.f64()?;
        for (code, value) in codes.into_iter().zip(values) {
            let category = classify(code.unwrap_or(""));
            let entry = tally.entry(category).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += value.unwrap_or(0.0);
        }
    }
    let mut stats: Vec<CategoryStat> = tally
        .into_iter()
        .map(|(category, (count, sum))| CategoryStat {
            category,
            count,
            sum,
        })
        .collect();
    stats.sort_by(|a, b| b.sum.total_cmp(&a.sum));
    Ok(stats)
}
