//! Recovery comparison command
//!
//! Compares nominal and HICP-deflated household consumption recovery
//! across southern and northern country groups: base-effect correlation
//! (deeper COVID drop, stronger rebound), recovery indices rebased to the
//! reference year, and the fiscal response of government consumption.

use crate::adapters::output::write_table;
use crate::cli::commands::{open_context, EXIT_FATAL};
use crate::core::deflate::PriceIndexTable;
use crate::core::summary::RunSummary;
use crate::core::temporal::{build_series, pct_change, pearson, Metric, TimeSeries};
use crate::domain::CountryCode;
use clap::Args;
use polars::prelude::*;
use tracing::info;

/// Arguments for the recovery command
#[derive(Args, Debug)]
pub struct RecoveryArgs {
    /// Year whose rebound is measured against the crisis trough
    #[arg(long, default_value_t = 2022)]
    pub recovery_year: i32,
}

impl RecoveryArgs {
    /// Execute the recovery command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let (config, store) = match open_context(config_path) {
            Ok(context) => context,
            Err(code) => return Ok(code),
        };
        let mut summary = RunSummary::new();

        info!(recovery_year = self.recovery_year, "Running recovery comparison");

        match run_recovery(&store, &config, self.recovery_year, &mut summary) {
            Ok(()) => {
                summary.log_summary("recovery");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Recovery analysis failed");
                println!("❌ Recovery analysis failed: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

/// Group label for a country: South, North or Other (kept for context).
fn region_of(config: &crate::config::FigaroConfig, country: &str) -> &'static str {
    if config.analysis.south.iter().any(|c| c == country) {
        "South"
    } else if config.analysis.north.iter().any(|c| c == country) {
        "North"
    } else {
        "Other"
    }
}

fn run_recovery(
    store: &crate::adapters::FlowStore,
    config: &crate::config::FigaroConfig,
    recovery_year: i32,
    summary: &mut RunSummary,
) -> crate::domain::Result<()> {
    let tables_dir = std::path::Path::new(&config.output.tables_dir);
    let analysis = &config.analysis;
    let reference_year = analysis.reference_year;
    let drop_year = analysis.evaluation_year;
    let years: Vec<i32> = (reference_year..=recovery_year + 1).collect();

    let deflators = match &config.deflator {
        Some(table) => PriceIndexTable::from_config(table),
        None => PriceIndexTable::eurostat_hicp(),
    };

    // South + North groups first, then remaining focus countries for context
    let mut country_codes: Vec<String> = Vec::new();
    country_codes.extend(analysis.south.iter().cloned());
    country_codes.extend(analysis.north.iter().cloned());
    for code in &analysis.focus_countries {
        if !country_codes.contains(code) {
            country_codes.push(code.clone());
        }
    }

    let components = vec![
        (
            Metric::HouseholdConsumption.key().to_string(),
            Metric::HouseholdConsumption.filter(),
        ),
        (
            Metric::GovernmentConsumption.key().to_string(),
            Metric::GovernmentConsumption.filter(),
        ),
    ];

    struct CountryRecovery {
        country: String,
        region: &'static str,
        hh: TimeSeries,
        gov: TimeSeries,
    }

    let mut per_country = Vec::new();
    for code in &country_codes {
        let country =
            CountryCode::new(code.clone()).map_err(crate::domain::FigaroError::Validation)?;
        let series = build_series(store, summary, &country, &years, &components)?;
        let [hh, gov]: [TimeSeries; 2] = series.try_into().map_err(|_| {
            crate::domain::FigaroError::Analysis("expected household and government series".into())
        })?;
        per_country.push(CountryRecovery {
            country: code.clone(),
            region: region_of(config, code),
            hh,
            gov,
        });
    }

    // Recovery indices: nominal and real, rebased to the reference year
    let mut idx_country = Vec::new();
    let mut idx_region = Vec::new();
    let mut idx_year = Vec::new();
    let mut idx_hh = Vec::new();
    let mut idx_nominal: Vec<Option<f64>> = Vec::new();
    let mut idx_deflator: Vec<Option<f64>> = Vec::new();
    let mut idx_real: Vec<Option<f64>> = Vec::new();

    for entry in &per_country {
        let base = entry.hh.value_for(reference_year).unwrap_or(0.0);
        for (&year, &value) in entry.hh.years.iter().zip(&entry.hh.values) {
            let nominal = if base > 0.0 {
                Some(value / base * 100.0)
            } else {
                summary.record_null_growth_zero_base();
                None
            };
            let deflator = deflators.deflator(&entry.country, year, reference_year);
            let real = match (nominal, deflator) {
                (Some(n), Some(d)) => Some(n / d * 100.0),
                _ => None,
            };
            idx_country.push(entry.country.clone());
            idx_region.push(entry.region.to_string());
            idx_year.push(year);
            idx_hh.push(value);
            idx_nominal.push(nominal);
            idx_deflator.push(deflator);
            idx_real.push(real);
        }
    }

    let mut comparison = df!(
        "country" => idx_country,
        "region" => idx_region,
        "year" => idx_year,
        "hh_consumption" => idx_hh,
        "nominal_index" => idx_nominal,
        "hicp_deflator" => idx_deflator,
        "real_index" => idx_real,
    )?;
    write_table(&mut comparison, tables_dir.join("recovery_comparison.csv"))?;
    summary.record_output_written();

    // Base effect: COVID drop vs. subsequent rebound
    let mut drop_pcts = Vec::new();
    let mut rebound_pcts = Vec::new();
    let mut be_country = Vec::new();
    let mut be_region = Vec::new();
    let mut be_drop: Vec<Option<f64>> = Vec::new();
    let mut be_rebound: Vec<Option<f64>> = Vec::new();
    let mut be_net: Vec<Option<f64>> = Vec::new();

    for entry in &per_country {
        let hh_ref = entry.hh.value_for(reference_year).unwrap_or(0.0);
        let hh_drop = entry.hh.value_for(drop_year).unwrap_or(0.0);
        let hh_recovered = entry.hh.value_for(recovery_year).unwrap_or(0.0);

        let drop = pct_change(hh_ref, hh_drop);
        let rebound = pct_change(hh_drop, hh_recovered);
        let net = pct_change(hh_ref, hh_recovered);
        if let (Some(d), Some(r)) = (drop, rebound) {
            drop_pcts.push(d);
            rebound_pcts.push(r);
        }

        be_country.push(entry.country.clone());
        be_region.push(entry.region.to_string());
        be_drop.push(drop);
        be_rebound.push(rebound);
        be_net.push(net);
    }

    let base_effect_r = pearson(&drop_pcts, &rebound_pcts);
    match base_effect_r {
        Some(r) => println!("Base effect: r = {r:.3} (drop {drop_year} vs. rebound {recovery_year}, n = {})", drop_pcts.len()),
        None => println!("Base effect: correlation undefined (insufficient data)"),
    }

    let mut base_effect = df!(
        "country" => be_country,
        "region" => be_region,
        "covid_drop_pct" => be_drop,
        "recovery_pct" => be_rebound,
        "net_change_pct" => be_net,
    )?;
    write_table(&mut base_effect, tables_dir.join("basis_effect_analysis.csv"))?;
    summary.record_output_written();

    // Fiscal response: government expansion vs. household stability
    let mut gov_growth_immediate = Vec::new();
    let mut hh_drops = Vec::new();
    let mut fr_country = Vec::new();
    let mut fr_region = Vec::new();
    let mut fr_gov_immediate: Vec<Option<f64>> = Vec::new();
    let mut fr_gov_full: Vec<Option<f64>> = Vec::new();
    let mut fr_hh_drop: Vec<Option<f64>> = Vec::new();
    let mut fr_hh_net: Vec<Option<f64>> = Vec::new();

    for entry in &per_country {
        let gov_ref = entry.gov.value_for(reference_year).unwrap_or(0.0);
        let gov_drop_year = entry.gov.value_for(drop_year).unwrap_or(0.0);
        let gov_recovered = entry.gov.value_for(recovery_year).unwrap_or(0.0);
        let hh_ref = entry.hh.value_for(reference_year).unwrap_or(0.0);
        let hh_drop_val = entry.hh.value_for(drop_year).unwrap_or(0.0);
        let hh_recovered = entry.hh.value_for(recovery_year).unwrap_or(0.0);

        let gov_immediate = pct_change(gov_ref, gov_drop_year);
        let gov_full = pct_change(gov_ref, gov_recovered);
        let hh_drop = pct_change(hh_ref, hh_drop_val);
        let hh_net = pct_change(hh_ref, hh_recovered);
        if let (Some(g), Some(h)) = (gov_immediate, hh_drop) {
            gov_growth_immediate.push(g);
            hh_drops.push(h);
        }

        fr_country.push(entry.country.clone());
        fr_region.push(entry.region.to_string());
        fr_gov_immediate.push(gov_immediate);
        fr_gov_full.push(gov_full);
        fr_hh_drop.push(hh_drop);
        fr_hh_net.push(hh_net);
    }

    match pearson(&gov_growth_immediate, &hh_drops) {
        Some(r) => println!("Fiscal cushion: r = {r:.3} (gov expansion vs. household drop)"),
        None => println!("Fiscal cushion: correlation undefined (insufficient data)"),
    }

    let mut fiscal = df!(
        "country" => fr_country,
        "region" => fr_region,
        "gov_growth_immediate_pct" => fr_gov_immediate,
        "gov_growth_full_pct" => fr_gov_full,
        "hh_drop_pct" => fr_hh_drop,
        "hh_net_change_pct" => fr_hh_net,
    )?;
    write_table(&mut fiscal, tables_dir.join("fiscal_response.csv"))?;
    summary.record_output_written();

    println!("✅ Recovery tables written to {}", tables_dir.display());
    Ok(())
}
