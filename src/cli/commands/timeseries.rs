//! Time series command
//!
//! Builds the six standard aggregates per country across the configured
//! year range and writes wide per-country series and YoY tables plus one
//! combined long-format table.

use crate::adapters::output::write_table;
use crate::cli::commands::{open_context, resolve_countries, EXIT_FATAL};
use crate::core::summary::RunSummary;
use crate::core::temporal::{build_series, metric_components, TimeSeries};
use clap::Args;
use polars::prelude::*;
use tracing::info;

/// Arguments for the timeseries command
#[derive(Args, Debug)]
pub struct TimeseriesArgs {
    /// Restrict to a single country
    #[arg(long)]
    pub country: Option<String>,
}

impl TimeseriesArgs {
    /// Execute the timeseries command
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
            start = config.analysis.start_year,
            end = config.analysis.end_year,
            "Building time series"
        );

        match run_timeseries(&store, &config, &countries, &mut summary) {
            Ok(()) => {
                summary.log_summary("timeseries");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Time series build failed");
                println!("❌ Time series build failed: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

/// Tallies a YoY row into the summary, splitting undefined changes by
/// cause: a gap year versus a legitimate zero base.
fn record_null_growth(summary: &mut RunSummary, series: &TimeSeries, yoy: &[Option<f64>]) {
    for (i, change) in yoy.iter().enumerate() {
        if i == 0 || change.is_some() {
            continue;
        }
        if series.missing[i - 1] || series.missing[i] {
            summary.record_null_growth_missing();
        } else {
            summary.record_null_growth_zero_base();
        }
    }
}

fn run_timeseries(
    store: &crate::adapters::FlowStore,
    config: &crate::config::FigaroConfig,
    countries: &[crate::domain::CountryCode],
    summary: &mut RunSummary,
) -> crate::domain::Result<()> {
    let tables_dir = std::path::Path::new(&config.output.tables_dir);
    let years = config.analysis.years();
    let components = metric_components();

    let mut long_country = Vec::new();
    let mut long_year = Vec::new();
    let mut long_metric = Vec::new();
    let mut long_value = Vec::new();

    for country in countries {
        let series = build_series(store, summary, country, &years, &components)?;

        // Wide per-country series table: year + one column per metric
        let mut series_columns = vec![Series::new("year", years.clone())];
        for ts in &series {
            series_columns.push(Series::new(&ts.key, ts.values.clone()));
        }
        let mut wide = DataFrame::new(series_columns)?;
        write_table(
            &mut wide,
            tables_dir.join(format!("{country}_time_series.csv")),
        )?;
        summary.record_output_written();

        // YoY table, nulls preserved
        let mut yoy_columns = vec![Series::new("year", years.clone())];
        for ts in &series {
            let yoy = ts.yoy();
            record_null_growth(summary, ts, &yoy);
            yoy_columns.push(Series::new(&ts.key, yoy));
        }
        let mut yoy_df = DataFrame::new(yoy_columns)?;
        write_table(
            &mut yoy_df,
            tables_dir.join(format!("{country}_yoy_changes.csv")),
        )?;
        summary.record_output_written();

        for ts in &series {
            for (&year, &value) in ts.years.iter().zip(&ts.values) {
                long_country.push(country.as_str().to_string());
                long_year.push(year);
                long_metric.push(ts.key.clone());
                long_value.push(value);
            }
        }
    }

    let mut combined = df!(
        "country" => long_country,
        "year" => long_year,
        "metric" => long_metric,
        "value" => long_value,
    )?;
    write_table(&mut combined, tables_dir.join("all_time_series.csv"))?;
    summary.record_output_written();

    println!(
        "✅ Time series for {} countries written to {}",
        countries.len(),
        tables_dir.display()
    );
    Ok(())
}
