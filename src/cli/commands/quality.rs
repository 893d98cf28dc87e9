//! Data quality report command
//!
//! Scans the store for coverage (rows per country and year), value
//! distribution, negative values and the category breakdown of row and
//! column codes. Writes three tables and prints a compact report.

use crate::adapters::output::write_table;
use crate::cli::commands::{open_context, resolve_countries, EXIT_FATAL};
use crate::core::aggregate::{category_sums, sum_where, value_distribution, FlowFilter};
use crate::core::classify::CodeCategory;
use crate::core::summary::RunSummary;
use crate::domain::flow::columns;
use clap::Args;
use polars::prelude::*;
use tracing::info;

/// Arguments for the quality command
#[derive(Args, Debug)]
pub struct QualityArgs {
    /// Year for the per-country statistics (defaults to the configured
    /// reference year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Restrict to a single country
    #[arg(long)]
    pub country: Option<String>,
}

impl QualityArgs {
    /// Execute the quality command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let (config, store) = match open_context(config_path) {
            Ok(context) => context,
            Err(code) => return Ok(code),
        };
        let countries = match resolve_countries(&config, self.country.as_deref()) {
            Ok(countries) => countries,
            Err(code) => return Ok(code),
        };
        let year = self.year.unwrap_or(config.analysis.reference_year);
        let mut summary = RunSummary::new();

        info!(year, countries = countries.len(), "Running data quality report");

        match run_quality(&store, &config, &countries, year, &mut summary) {
            Ok(()) => {
                summary.log_summary("quality");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Quality report failed");
                println!("❌ Quality report failed: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

fn run_quality(
    store: &crate::adapters::FlowStore,
    config: &crate::config::FigaroConfig,
    countries: &[crate::domain::CountryCode],
    year: i32,
    summary: &mut RunSummary,
) -> crate::domain::Result<()> {
    let tables_dir = std::path::Path::new(&config.output.tables_dir);

    // Coverage: rows per (year, country) over the whole store
    let mut cov_years = Vec::new();
    let mut cov_countries = Vec::new();
    let mut cov_rows: Vec<u32> = Vec::new();
    for store_year in store.years()? {
        for country in store.countries(store_year)? {
            match store.try_load(&country, store_year)? {
                Some(df) => {
                    summary.record_partition_read();
                    cov_years.push(store_year);
                    cov_countries.push(country.into_inner());
                    cov_rows.push(df.height() as u32);
                }
                None => summary.record_partition_missing(),
            }
        }
    }
    let mut coverage = df!(
        "year" => cov_years,
        "country" => cov_countries,
        "rows" => cov_rows,
    )?;
    write_table(&mut coverage, tables_dir.join("coverage_matrix.csv"))?;
    summary.record_output_written();

    // Whole-dataset value distribution
    let all = store.load_all()?;
    println!("Dataset: {} rows across {} partitions", all.height(), coverage.height());
    if let Some(dist) = value_distribution(&all)? {
        println!(
            "Values: min {:.1}  q1 {:.1}  median {:.1}  q3 {:.1}  max {:.1}",
            dist.min, dist.q1, dist.median, dist.q3, dist.max
        );
        println!(
            "Negatives: {} rows summing {:.1}; IQR outliers: {} low, {} high",
            dist.negatives, dist.negative_sum, dist.outliers_low, dist.outliers_high
        );
    }

    // Per-country statistics for the report year
    let mut stat_country = Vec::new();
    let mut stat_rows: Vec<u32> = Vec::new();
    let mut stat_total = Vec::new();
    let mut stat_domestic = Vec::new();
    let mut stat_foreign = Vec::new();
    let mut stat_negatives: Vec<u32> = Vec::new();
    let mut stat_negative_sum = Vec::new();

    // Category breakdown rows, both code axes
    let mut cat_country = Vec::new();
    let mut cat_axis = Vec::new();
    let mut cat_label = Vec::new();
    let mut cat_count: Vec<u64> = Vec::new();
    let mut cat_sum = Vec::new();

    for country in countries {
        let df = match store.try_load(country, year)? {
            Some(df) => {
                summary.record_partition_read();
                df
            }
            None => {
                summary.record_partition_missing();
                println!("{country}: no partition for {year}");
                continue;
            }
        };

        let total = sum_where(&df, &FlowFilter::default())?;
        let domestic = sum_where(&df, &FlowFilter::default().domestic(true))?;
        let foreign = sum_where(&df, &FlowFilter::default().domestic(false))?;
        let dist = value_distribution(&df)?;

        stat_country.push(country.as_str().to_string());
        stat_rows.push(df.height() as u32);
        stat_total.push(total);
        stat_domestic.push(domestic);
        stat_foreign.push(foreign);
        stat_negatives.push(dist.as_ref().map(|d| d.negatives as u32).unwrap_or(0));
        stat_negative_sum.push(dist.as_ref().map(|d| d.negative_sum).unwrap_or(0.0));

        for (axis, code_column) in [("Set_i", columns::ROW_CODE), ("Set_j", columns::COL_CODE)] {
            for stat in category_sums(&df, code_column)? {
                if stat.category == CodeCategory::Unclassified {
                    summary.record_unclassified(stat.count);
                }
                cat_country.push(country.as_str().to_string());
                cat_axis.push(axis.to_string());
                cat_label.push(stat.category.label().to_string());
                cat_count.push(stat.count);
                cat_sum.push(stat.sum);
            }
        }
    }

    let mut statistics = df!(
        "country" => stat_country,
        "rows" => stat_rows,
        "total_value" => stat_total,
        "domestic_value" => stat_domestic,
        "foreign_value" => stat_foreign,
        "negative_rows" => stat_negatives,
        "negative_sum" => stat_negative_sum,
    )?;
    write_table(&mut statistics, tables_dir.join("country_statistics.csv"))?;
    summary.record_output_written();

    let mut categories = df!(
        "country" => cat_country,
        "axis" => cat_axis,
        "category" => cat_label,
        "count" => cat_count,
        "sum" => cat_sum,
    )?;
    write_table(&mut categories, tables_dir.join("category_breakdown.csv"))?;
    summary.record_output_written();

    println!(
        "✅ Quality report written to {} (coverage, statistics, categories)",
        tables_dir.display()
    );
    Ok(())
}
