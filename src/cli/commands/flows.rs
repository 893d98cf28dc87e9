//! Top flows command
//!
//! Ranks flows for one year: largest (Set_i, Set_j) pairs by magnitude,
//! wages by industry, household final demand by product and import
//! partners, plus a cross-country table of the six key aggregates.

use crate::adapters::output::write_table;
use crate::cli::commands::{open_context, resolve_countries, EXIT_FATAL};
use crate::core::aggregate::{group_sum, group_sum_pairs, sum_where, FlowFilter};
use crate::core::classify::{classify, CodeCategory};
use crate::core::summary::RunSummary;
use crate::core::temporal::Metric;
use crate::domain::flow::columns;
use crate::reference::{code_label, country_name, sector_name};
use clap::Args;
use polars::prelude::*;
use tracing::info;

/// Arguments for the flows command
#[derive(Args, Debug)]
pub struct FlowsArgs {
    /// Year to analyze (defaults to the configured reference year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Restrict to a single country
    #[arg(long)]
    pub country: Option<String>,

    /// Number of entries per ranked table (defaults to the configured top_n)
    #[arg(long)]
    pub top: Option<usize>,
}

impl FlowsArgs {
    /// Execute the flows command
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
        let top_n = self.top.unwrap_or(config.analysis.top_n);
        let mut summary = RunSummary::new();

        info!(year, top_n, "Running top flows analysis");

        match run_flows(&store, &config, &countries, year, top_n, &mut summary) {
            Ok(()) => {
                summary.log_summary("flows");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Flows analysis failed");
                println!("❌ Flows analysis failed: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

fn run_flows(
    store: &crate::adapters::FlowStore,
    config: &crate::config::FigaroConfig,
    countries: &[crate::domain::CountryCode],
    year: i32,
    top_n: usize,
    summary: &mut RunSummary,
) -> crate::domain::Result<()> {
    let tables_dir = std::path::Path::new(&config.output.tables_dir);

    // Cross-country key aggregates
    let mut agg_country = Vec::new();
    let mut agg_metric = Vec::new();
    let mut agg_label = Vec::new();
    let mut agg_value = Vec::new();

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

        // Largest flows by magnitude, either direction
        let mut pairs = group_sum_pairs(&df, &FlowFilter::default())?;
        pairs.sort_by(|a, b| b.2.abs().total_cmp(&a.2.abs()));
        pairs.truncate(top_n);
        let mut top_flows = df!(
            "set_i" => pairs.iter().map(|p| p.0.clone()).collect::<Vec<_>>(),
            "set_i_label" => pairs.iter().map(|p| code_label(&p.0).to_string()).collect::<Vec<_>>(),
            "set_j" => pairs.iter().map(|p| p.1.clone()).collect::<Vec<_>>(),
            "set_j_label" => pairs.iter().map(|p| code_label(&p.1).to_string()).collect::<Vec<_>>(),
            "value" => pairs.iter().map(|p| p.2).collect::<Vec<_>>(),
        )?;
        write_table(
            &mut top_flows,
            tables_dir.join(format!("{country}_top_flows_{year}.csv")),
        )?;
        summary.record_output_written();

        // Wages by receiving industry
        let mut wages = group_sum(
            &df,
            columns::COL_CODE,
            &FlowFilter::row_code("D11").domestic(true),
        )?;
        wages.truncate(top_n);
        let mut wages_df = df!(
            "industry" => wages.iter().map(|w| w.0.clone()).collect::<Vec<_>>(),
            "industry_label" => wages.iter().map(|w| sector_name(&w.0)).collect::<Vec<_>>(),
            "value" => wages.iter().map(|w| w.1).collect::<Vec<_>>(),
        )?;
        write_table(
            &mut wages_df,
            tables_dir.join(format!("{country}_wages_by_industry_{year}.csv")),
        )?;
        summary.record_output_written();

        // Operating surplus by industry
        let mut surplus = group_sum(
            &df,
            columns::COL_CODE,
            &FlowFilter::row_code("B2").domestic(true),
        )?;
        surplus.truncate(top_n);
        let mut surplus_df = df!(
            "industry" => surplus.iter().map(|s| s.0.clone()).collect::<Vec<_>>(),
            "industry_label" => surplus.iter().map(|s| sector_name(&s.0)).collect::<Vec<_>>(),
            "value" => surplus.iter().map(|s| s.1).collect::<Vec<_>>(),
        )?;
        write_table(
            &mut surplus_df,
            tables_dir.join(format!("{country}_surplus_by_industry_{year}.csv")),
        )?;
        summary.record_output_written();

        // Domestic intermediate consumption: product rows into industries,
        // final-use columns excluded
        let mut intermediate = group_sum_pairs(
            &df,
            &FlowFilter::default().with_row_prefix("CPA_").domestic(true),
        )?;
        intermediate.retain(|(_, industry, _)| classify(industry) == CodeCategory::Industry);
        intermediate.truncate(top_n);
        let mut intermediate_df = df!(
            "product" => intermediate.iter().map(|i| i.0.clone()).collect::<Vec<_>>(),
            "product_label" => intermediate.iter().map(|i| sector_name(&i.0)).collect::<Vec<_>>(),
            "industry" => intermediate.iter().map(|i| i.1.clone()).collect::<Vec<_>>(),
            "industry_label" => intermediate.iter().map(|i| sector_name(&i.1)).collect::<Vec<_>>(),
            "value" => intermediate.iter().map(|i| i.2).collect::<Vec<_>>(),
        )?;
        write_table(
            &mut intermediate_df,
            tables_dir.join(format!("{country}_intermediate_consumption_{year}.csv")),
        )?;
        summary.record_output_written();

        // Household final demand by product
        let mut demand = group_sum(
            &df,
            columns::ROW_CODE,
            &FlowFilter::column_code("P3_S14").domestic(true),
        )?;
        demand.truncate(top_n);
        let mut demand_df = df!(
            "product" => demand.iter().map(|d| d.0.clone()).collect::<Vec<_>>(),
            "product_label" => demand.iter().map(|d| sector_name(&d.0)).collect::<Vec<_>>(),
            "value" => demand.iter().map(|d| d.1).collect::<Vec<_>>(),
        )?;
        write_table(
            &mut demand_df,
            tables_dir.join(format!("{country}_final_demand_{year}.csv")),
        )?;
        summary.record_output_written();

        // Import origins
        let mut partners = group_sum(
            &df,
            columns::ORIGIN,
            &FlowFilter::default().with_row_prefix("CPA_").domestic(false),
        )?;
        partners.truncate(top_n);
        let mut partners_df = df!(
            "partner" => partners.iter().map(|p| p.0.clone()).collect::<Vec<_>>(),
            "partner_name" => partners.iter().map(|p| country_name(&p.0).to_string()).collect::<Vec<_>>(),
            "value" => partners.iter().map(|p| p.1).collect::<Vec<_>>(),
        )?;
        write_table(
            &mut partners_df,
            tables_dir.join(format!("{country}_import_partners_{year}.csv")),
        )?;
        summary.record_output_written();

        // Imported products
        let mut import_products = group_sum(
            &df,
            columns::ROW_CODE,
            &FlowFilter::default().with_row_prefix("CPA_").domestic(false),
        )?;
        import_products.truncate(top_n);
        let mut import_products_df = df!(
            "product" => import_products.iter().map(|p| p.0.clone()).collect::<Vec<_>>(),
            "product_label" => import_products.iter().map(|p| sector_name(&p.0)).collect::<Vec<_>>(),
            "value" => import_products.iter().map(|p| p.1).collect::<Vec<_>>(),
        )?;
        write_table(
            &mut import_products_df,
            tables_dir.join(format!("{country}_import_products_{year}.csv")),
        )?;
        summary.record_output_written();

        for metric in Metric::all() {
            let value = sum_where(&df, &metric.filter())?;
            if value == 0.0 {
                summary.record_zero_aggregate();
            }
            agg_country.push(country.as_str().to_string());
            agg_metric.push(metric.key().to_string());
            agg_label.push(metric.label().to_string());
            agg_value.push(value);
        }
    }

    let mut aggregates = df!(
        "country" => agg_country,
        "metric" => agg_metric,
        "metric_label" => agg_label,
        "value" => agg_value,
    )?;
    write_table(
        &mut aggregates,
        tables_dir.join(format!("key_aggregates_{year}.csv")),
    )?;
    summary.record_output_written();

    println!("✅ Flow tables written to {}", tables_dir.display());
    Ok(())
}
