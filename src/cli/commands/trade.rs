//! Bilateral trade command
//!
//! Reconstructs exports from partner books, pairs them with the focal
//! country's own import rows and writes partner balances plus product
//! and category breakdowns of the reconstructed exports.

use crate::adapters::output::write_table;
use crate::cli::commands::{open_context, resolve_countries, EXIT_FATAL};
use crate::core::aggregate::{group_sum, FlowFilter};
use crate::core::bilateral::{exports_of, imports_of, trade_balance};
use crate::core::summary::RunSummary;
use crate::domain::flow::columns;
use crate::domain::CountryCode;
use crate::reference::{country_name, product_category, sector_name};
use clap::Args;
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::info;

/// Arguments for the trade command
#[derive(Args, Debug)]
pub struct TradeArgs {
    /// Focal country (defaults to every configured focus country)
    #[arg(long)]
    pub country: Option<String>,

    /// Year to reconcile (defaults to the configured trade year)
    #[arg(long)]
    pub year: Option<i32>,
}

impl TradeArgs {
    /// Execute the trade command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let (config, store) = match open_context(config_path) {
            Ok(context) => context,
            Err(code) => return Ok(code),
        };
        let countries = match resolve_countries(&config, self.country.as_deref()) {
            Ok(countries) => countries,
            Err(code) => return Ok(code),
        };
        let year = self.year.unwrap_or(config.analysis.trade_year);
        let mut summary = RunSummary::new();

        info!(year, "Running bilateral trade reconstruction");

        match run_trade(&store, &config, &countries, year, &mut summary) {
            Ok(()) => {
                summary.log_summary("trade");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Trade analysis failed");
                println!("❌ Trade analysis failed: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

fn run_trade(
    store: &crate::adapters::FlowStore,
    config: &crate::config::FigaroConfig,
    countries: &[CountryCode],
    year: i32,
    summary: &mut RunSummary,
) -> crate::domain::Result<()> {
    let tables_dir = std::path::Path::new(&config.output.tables_dir);
    let partners: Vec<CountryCode> = config
        .analysis
        .partner_universe
        .iter()
        .map(|code| CountryCode::new(code.clone()).map_err(crate::domain::FigaroError::Validation))
        .collect::<crate::domain::Result<_>>()?;

    for focal in countries {
        let exports = exports_of(store, summary, focal, year, &partners)?;
        let imports = imports_of(store, summary, focal, year)?;
        let balances = trade_balance(&exports, &imports)?;

        // Partner balances, busiest relationships first
        let mut sorted: Vec<(&String, _)> = balances.iter().collect();
        sorted.sort_by(|a, b| b.1.total.total_cmp(&a.1.total));
        let mut balance_df = df!(
            "partner" => sorted.iter().map(|(p, _)| (*p).clone()).collect::<Vec<_>>(),
            "partner_name" => sorted.iter().map(|(p, _)| country_name(p).to_string()).collect::<Vec<_>>(),
            "exports" => sorted.iter().map(|(_, b)| b.exports).collect::<Vec<_>>(),
            "imports" => sorted.iter().map(|(_, b)| b.imports).collect::<Vec<_>>(),
            "balance" => sorted.iter().map(|(_, b)| b.balance).collect::<Vec<_>>(),
            "total" => sorted.iter().map(|(_, b)| b.total).collect::<Vec<_>>(),
        )?;
        write_table(
            &mut balance_df,
            tables_dir.join(format!("{focal}_trade_balance_{year}.csv")),
        )?;
        summary.record_output_written();

        // Exports by product
        let by_product = group_sum(&exports, columns::ROW_CODE, &FlowFilter::default())?;
        let total_exports: f64 = by_product.iter().map(|(_, v)| v).sum();
        if total_exports == 0.0 {
            summary.record_zero_aggregate();
        }
        let share = |value: f64| {
            if total_exports > 0.0 {
                value / total_exports * 100.0
            } else {
                0.0
            }
        };
        let mut product_df = df!(
            "product" => by_product.iter().map(|(p, _)| p.clone()).collect::<Vec<_>>(),
            "product_label" => by_product.iter().map(|(p, _)| sector_name(p)).collect::<Vec<_>>(),
            "export_value" => by_product.iter().map(|(_, v)| *v).collect::<Vec<_>>(),
            "share_pct" => by_product.iter().map(|(_, v)| share(*v)).collect::<Vec<_>>(),
        )?;
        write_table(
            &mut product_df,
            tables_dir.join(format!("{focal}_exports_by_product_{year}.csv")),
        )?;
        summary.record_output_written();

        // Exports by product category
        let mut by_category: BTreeMap<&'static str, f64> = BTreeMap::new();
        for (product, value) in &by_product {
            *by_category.entry(product_category(product)).or_insert(0.0) += value;
        }
        let mut categories: Vec<(&str, f64)> =
            by_category.into_iter().collect();
        categories.sort_by(|a, b| b.1.total_cmp(&a.1));
        let mut category_df = df!(
            "category" => categories.iter().map(|(c, _)| c.to_string()).collect::<Vec<_>>(),
            "export_value" => categories.iter().map(|(_, v)| *v).collect::<Vec<_>>(),
            "share_pct" => categories.iter().map(|(_, v)| share(*v)).collect::<Vec<_>>(),
        )?;
        write_table(
            &mut category_df,
            tables_dir.join(format!("{focal}_exports_by_category_{year}.csv")),
        )?;
        summary.record_output_written();

        let total_imports: f64 = balances.values().map(|b| b.imports).sum();
        println!(
            "{focal} {year}: exports {total_exports:.0}, imports {total_imports:.0}, balance {:.0} (million EUR)",
            total_exports - total_imports
        );
    }

    println!("✅ Trade tables written to {}", tables_dir.display());
    Ok(())
}
