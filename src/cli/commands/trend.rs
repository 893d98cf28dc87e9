//! Baseline trend command
//!
//! Fits a compound growth rate over the pre-crisis baseline window for
//! the final-use aggregates, extrapolates it to the evaluation year and
//! measures how far the actual values fell from trend.
//!
//! The components here are column-code totals without the domestic mask:
//! the trend is about total final use, imported content included.

use crate::adapters::output::write_table;
use crate::cli::commands::{open_context, resolve_countries, EXIT_FATAL};
use crate::core::aggregate::FlowFilter;
use crate::core::summary::RunSummary;
use crate::core::temporal::{
    build_series, cagr, deviation_from_trend, pct_change, trend_extrapolate, TimeSeries,
};
use clap::Args;
use polars::prelude::*;
use tracing::info;

/// Arguments for the trend command
#[derive(Args, Debug)]
pub struct TrendArgs {
    /// Restrict to a single country
    #[arg(long)]
    pub country: Option<String>,
}

/// Final-use components tracked against trend.
fn trend_components() -> Vec<(String, FlowFilter)> {
    vec![
        ("hh_consumption".to_string(), FlowFilter::column_code("P3_S14")),
        ("gov_consumption".to_string(), FlowFilter::column_code("P3_S13")),
        ("investment".to_string(), FlowFilter::column_code("P51G")),
        ("exports".to_string(), FlowFilter::column_code("P6")),
    ]
}

/// Tallies an undefined baseline rate by cause: a gap partition at either
/// window endpoint versus a non-positive base value.
fn record_null_cagr(summary: &mut RunSummary, ts: &TimeSeries, start: i32, end: i32) {
    let missing_at = |year: i32| {
        ts.years
            .iter()
            .position(|&y| y == year)
            .map(|i| ts.missing[i])
            .unwrap_or(false)
    };
    if missing_at(start) || missing_at(end) {
        summary.record_null_growth_missing();
    } else {
        summary.record_null_growth_zero_base();
    }
}

impl TrendArgs {
    /// Execute the trend command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let (config, store) = match open_context(config_path) {
            Ok(context) => context,
            Err(code) => return Ok(code),
        };
        let countries = match resolve_countries(&config, self.country.as_deref()) {
            Ok(countries) => countries,
            Err(code) => return Ok(code),
        };
        let mut summary = RunSummary::new();

        info!(
            baseline_start = config.analysis.baseline_start,
            baseline_end = config.analysis.baseline_end,
            evaluation_year = config.analysis.evaluation_year,
            "Running baseline trend analysis"
        );

        match run_trend(&store, &config, &countries, &mut summary) {
            Ok(()) => {
                summary.log_summary("trend");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Trend analysis failed");
                println!("❌ Trend analysis failed: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

fn run_trend(
    store: &crate::adapters::FlowStore,
    config: &crate::config::FigaroConfig,
    countries: &[crate::domain::CountryCode],
    summary: &mut RunSummary,
) -> crate::domain::Result<()> {
    let tables_dir = std::path::Path::new(&config.output.tables_dir);
    let analysis = &config.analysis;
    let years: Vec<i32> = (analysis.baseline_start..=analysis.evaluation_year).collect();
    let span = analysis.baseline_end - analysis.baseline_start;
    let forward = analysis.evaluation_year - analysis.baseline_end;
    let components = trend_components();

    let mut out_country = Vec::new();
    let mut out_component = Vec::new();
    let mut out_start = Vec::new();
    let mut out_end = Vec::new();
    let mut out_cagr: Vec<Option<f64>> = Vec::new();
    let mut out_trend: Vec<Option<f64>> = Vec::new();
    let mut out_actual = Vec::new();
    let mut out_yoy: Vec<Option<f64>> = Vec::new();
    let mut out_deviation: Vec<Option<f64>> = Vec::new();

    for country in countries {
        let series = build_series(store, summary, country, &years, &components)?;
        for ts in &series {
            let v_start = ts.value_for(analysis.baseline_start).unwrap_or(0.0);
            let v_end = ts.value_for(analysis.baseline_end).unwrap_or(0.0);
            let actual = ts.value_for(analysis.evaluation_year).unwrap_or(0.0);

            let prior = ts.value_for(analysis.evaluation_year - 1).unwrap_or(0.0);

            let rate = cagr(v_start, v_end, span);
            if rate.is_none() {
                record_null_cagr(summary, ts, analysis.baseline_start, analysis.baseline_end);
            }
            let trend = trend_extrapolate(v_end, rate, forward);
            let deviation = deviation_from_trend(actual, trend);
            let yoy = pct_change(prior, actual);

            out_country.push(country.as_str().to_string());
            out_component.push(ts.key.clone());
            out_start.push(v_start);
            out_end.push(v_end);
            out_cagr.push(rate.map(|r| r * 100.0));
            out_trend.push(trend);
            out_actual.push(actual);
            out_yoy.push(yoy);
            out_deviation.push(deviation);
        }
    }

    let mut full = df!(
        "country" => out_country.clone(),
        "component" => out_component.clone(),
        "baseline_start_value" => out_start,
        "baseline_end_value" => out_end,
        "baseline_cagr_pct" => out_cagr.clone(),
        "trend_value" => out_trend.clone(),
        "actual_value" => out_actual.clone(),
        "evaluation_yoy_pct" => out_yoy,
        "deviation_pct" => out_deviation.clone(),
    )?;
    write_table(&mut full, tables_dir.join("baseline_trend_analysis.csv"))?;
    summary.record_output_written();

    let mut cagr_table = df!(
        "country" => out_country.clone(),
        "component" => out_component.clone(),
        "baseline_cagr_pct" => out_cagr,
    )?;
    write_table(&mut cagr_table, tables_dir.join("baseline_trends_cagr.csv"))?;
    summary.record_output_written();

    let mut deviation_table = df!(
        "country" => out_country,
        "component" => out_component,
        "actual_value" => out_actual,
        "trend_value" => out_trend,
        "deviation_pct" => out_deviation,
    )?;
    write_table(&mut deviation_table, tables_dir.join("trend_deviation.csv"))?;
    summary.record_output_written();

    println!(
        "✅ Baseline trend ({}-{}, evaluated {}) written to {}",
        analysis.baseline_start,
        analysis.baseline_end,
        analysis.evaluation_year,
        tables_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CountryCode;

    fn series(values: Vec<f64>, missing: Vec<bool>) -> TimeSeries {
        TimeSeries {
            country: CountryCode::new("DE").unwrap(),
            key: "hh_consumption".to_string(),
            years: vec![2015, 2016, 2017, 2018, 2019],
            values,
            missing,
        }
    }

    #[test]
    fn test_missing_endpoint_counts_as_missing_growth() {
        let mut summary = RunSummary::new();
        // 2015 partition absent: the zero base value is a gap, not data
        let ts = series(
            vec![0.0, 10.0, 11.0, 12.0, 13.0],
            vec![true, false, false, false, false],
        );
        assert_eq!(cagr(0.0, 13.0, 4), None);
        record_null_cagr(&mut summary, &ts, 2015, 2019);
        assert_eq!(summary.null_growth_missing, 1);
        assert_eq!(summary.null_growth_zero_base, 0);
    }

    #[test]
    fn test_zero_base_with_data_counts_as_zero_base() {
        let mut summary = RunSummary::new();
        // Both endpoints present; the base really is zero
        let ts = series(
            vec![0.0, 10.0, 11.0, 12.0, 13.0],
            vec![false, false, false, false, false],
        );
        record_null_cagr(&mut summary, &ts, 2015, 2019);
        assert_eq!(summary.null_growth_missing, 0);
        assert_eq!(summary.null_growth_zero_base, 1);
    }
}
