//! Dashboard generation command
//!
//! Produces the JSON artifacts consumed by the static dashboard:
//! `time_series.json`, `trade_partners.json`, `sectors.json`,
//! `linkages.json`, `sankey.json` and `metadata.json`. All values are
//! plain number/string/null maps; display names come from the static
//! reference tables.

use crate::adapters::output::write_json;
use crate::cli::commands::{open_context, resolve_countries, EXIT_FATAL};
use crate::core::aggregate::{group_sum, group_sum_pairs, sum_where, FlowFilter};
use crate::core::bilateral::{exports_of, imports_of, trade_balance};
use crate::core::summary::RunSummary;
use crate::core::temporal::{build_series, metric_components, Metric};
use crate::domain::flow::columns;
use crate::domain::CountryCode;
use crate::reference::{country_name, label_tables, sector_name};
use clap::Args;
use polars::prelude::*;
use serde_json::{json, Map, Value};
use tracing::info;

/// NACE industry codes in `Set_j`: letter+digit combinations or a bare
/// section letter. Broader than the Industry classify bucket on purpose;
/// it mirrors how the dashboard slices intermediate consumption.
const INDUSTRY_PATTERN: &str = "^[A-Z][0-9]|^[A-Z]$";

/// Arguments for the dashboard command
#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Snapshot year for trade, sector and linkage files (defaults to the
    /// configured trade year)
    #[arg(long)]
    pub year: Option<i32>,
}

impl DashboardArgs {
    /// Execute the dashboard command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let (config, store) = match open_context(config_path) {
            Ok(context) => context,
            Err(code) => return Ok(code),
        };
        let countries = match resolve_countries(&config, None) {
            Ok(countries) => countries,
            Err(code) => return Ok(code),
        };
        let year = self.year.unwrap_or(config.analysis.trade_year);
        let mut summary = RunSummary::new();

        info!(year, "Generating dashboard JSON");

        match run_dashboard(&store, &config, &countries, year, &mut summary) {
            Ok(()) => {
                summary.log_summary("dashboard");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Dashboard generation failed");
                println!("❌ Dashboard generation failed: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

fn run_dashboard(
    store: &crate::adapters::FlowStore,
    config: &crate::config::FigaroConfig,
    countries: &[CountryCode],
    year: i32,
    summary: &mut RunSummary,
) -> crate::domain::Result<()> {
    let json_dir = std::path::Path::new(&config.output.json_dir);

    let time_series = generate_time_series(store, config, countries, summary)?;
    write_json(&time_series, json_dir.join("time_series.json"))?;
    summary.record_output_written();

    let trade = generate_trade_partners(store, config, countries, year, summary)?;
    write_json(&trade, json_dir.join("trade_partners.json"))?;
    summary.record_output_written();

    let sectors = generate_sectors(store, countries, year, summary)?;
    write_json(&sectors, json_dir.join("sectors.json"))?;
    summary.record_output_written();

    let linkages = generate_linkages(store, config, countries, year, summary)?;
    write_json(&linkages, json_dir.join("linkages.json"))?;
    summary.record_output_written();

    let sankey = generate_sankey(store, config, countries, summary)?;
    write_json(&sankey, json_dir.join("sankey.json"))?;
    summary.record_output_written();

    let metadata = generate_metadata(config);
    write_json(&metadata, json_dir.join("metadata.json"))?;
    summary.record_output_written();

    println!("✅ Dashboard JSON written to {}", json_dir.display());
    Ok(())
}

fn generate_time_series(
    store: &crate::adapters::FlowStore,
    config: &crate::config::FigaroConfig,
    countries: &[CountryCode],
    summary: &mut RunSummary,
) -> crate::domain::Result<Value> {
    let years = config.analysis.years();
    let components = metric_components();

    let mut aggregates: Map<String, Value> = Map::new();
    for metric in Metric::all() {
        aggregates.insert(metric.key().to_string(), Value::Object(Map::new()));
    }
    let mut changes: Map<String, Value> = Map::new();

    for country in countries {
        let series = build_series(store, summary, country, &years, &components)?;
        let mut country_changes: Map<String, Value> = Map::new();
        for ts in &series {
            if let Some(Value::Object(by_country)) = aggregates.get_mut(&ts.key) {
                by_country.insert(country.as_str().to_string(), json!(ts.values));
            }
            country_changes.insert(ts.key.clone(), json!(ts.yoy()));
        }
        changes.insert(country.as_str().to_string(), Value::Object(country_changes));
    }

    let country_names: Map<String, Value> = countries
        .iter()
        .map(|c| (c.as_str().to_string(), json!(country_name(c.as_str()))))
        .collect();

    Ok(json!({
        "years": years,
        "countries": countries.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
        "country_names": country_names,
        "aggregates": aggregates,
        "changes": changes,
        "crisis_markers": [
            {"year": 2020, "label": "COVID-19"},
            {"year": 2022, "label": "Energy Crisis"}
        ]
    }))
}

/// Ranked share entries: `[{partner, partner_name, value, share}]`.
fn share_entries(pairs: &[(String, f64)], top_n: usize, name: fn(&str) -> String) -> Vec<Value> {
    let total: f64 = pairs.iter().map(|(_, v)| v).sum();
    pairs
        .iter()
        .take(top_n)
        .map(|(key, value)| {
            let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            json!({
                "partner": key,
                "partner_name": name(key),
                "value": value,
                "share": share,
            })
        })
        .collect()
}

fn generate_trade_partners(
    store: &crate::adapters::FlowStore,
    config: &crate::config::FigaroConfig,
    countries: &[CountryCode],
    year: i32,
    summary: &mut RunSummary,
) -> crate::domain::Result<Value> {
    let top_n = config.analysis.top_n;
    let partners: Vec<CountryCode> = config
        .analysis
        .partner_universe
        .iter()
        .map(|code| CountryCode::new(code.clone()).map_err(crate::domain::FigaroError::Validation))
        .collect::<crate::domain::Result<_>>()?;

    let mut result: Map<String, Value> = Map::new();
    for focal in countries {
        let exports = exports_of(store, summary, focal, year, &partners)?;
        let imports = imports_of(store, summary, focal, year)?;
        if exports.height() == 0 && imports.height() == 0 {
            summary.record_zero_aggregate();
            continue;
        }

        let exports_by_partner =
            group_sum(&exports, columns::DESTINATION, &FlowFilter::default())?;
        let imports_by_partner = group_sum(&imports, columns::ORIGIN, &FlowFilter::default())?;
        let imports_by_sector = group_sum(&imports, columns::ROW_CODE, &FlowFilter::default())?;

        let balances = trade_balance(&exports, &imports)?;
        let mut balance_entries: Vec<(&String, _)> = balances.iter().collect();
        balance_entries.sort_by(|a, b| b.1.total.total_cmp(&a.1.total));
        let balance: Vec<Value> = balance_entries
            .iter()
            .map(|(partner, b)| {
                json!({
                    "partner": partner,
                    "partner_name": country_name(partner),
                    "exports": b.exports,
                    "imports": b.imports,
                    "net": b.balance,
                    "total": b.total,
                })
            })
            .collect();

        let total_imports: f64 = imports_by_sector.iter().map(|(_, v)| v).sum();
        let sector_entries: Vec<Value> = imports_by_sector
            .iter()
            .take(top_n)
            .map(|(code, value)| {
                let share = if total_imports > 0.0 {
                    value / total_imports * 100.0
                } else {
                    0.0
                };
                json!({
                    "code": code,
                    "label": sector_name(code),
                    "value": value,
                    "share": share,
                })
            })
            .collect();

        result.insert(
            focal.as_str().to_string(),
            json!({
                "year": year,
                "exports": share_entries(&exports_by_partner, top_n, |c| country_name(c).to_string()),
                "imports": share_entries(&imports_by_partner, top_n, |c| country_name(c).to_string()),
                "balance": balance,
                "imports_by_sector": sector_entries,
            }),
        );
    }

    result.insert(
        "_meta".to_string(),
        json!({
            "countries": result.keys().cloned().collect::<Vec<_>>(),
            "note": format!("Bilateral trade reconstructed from partner books, FIGARO-NAM {year}."),
        }),
    );
    Ok(Value::Object(result))
}

/// Ranked `{code, label, value}` entries from grouped sums.
fn labeled_entries(pairs: &[(String, f64)], top_n: usize) -> Vec<Value> {
    pairs
        .iter()
        .take(top_n)
        .map(|(code, value)| {
            json!({
                "code": code,
                "label": sector_name(code),
                "value": value,
            })
        })
        .collect()
}

fn generate_sectors(
    store: &crate::adapters::FlowStore,
    countries: &[CountryCode],
    year: i32,
    summary: &mut RunSummary,
) -> crate::domain::Result<Value> {
    let dynamics_years: Vec<i32> = (year..=year + 3).collect();

    let mut result: Map<String, Value> = Map::new();
    for country in countries {
        let Some(base) = store.try_load(country, year)? else {
            summary.record_partition_missing();
            continue;
        };
        summary.record_partition_read();

        // Sector output per year for the dynamics view
        let mut output_by_year: Vec<(i32, Vec<(String, f64)>)> = Vec::new();
        for &dyn_year in &dynamics_years {
            let Some(df) = store.try_load(country, dyn_year)? else {
                summary.record_partition_missing();
                continue;
            };
            summary.record_partition_read();
            let industries = df
                .lazy()
                .filter(
                    col(columns::COL_CODE)
                        .str()
                        .contains(lit(INDUSTRY_PATTERN), true)
                        .and(col(columns::ORIGIN).eq(col(columns::DECLARANT))),
                )
                .collect()?;
            let sums = group_sum(&industries, columns::COL_CODE, &FlowFilter::default())?;
            output_by_year.push((dyn_year, sums));
        }

        let mut dynamics = Vec::new();
        if let Some((_, first)) = output_by_year.first() {
            for (sector, _) in first {
                let mut sector_changes: Map<String, Value> = Map::new();
                for window in output_by_year.windows(2) {
                    let prev = window[0].1.iter().find(|(s, _)| s == sector).map(|(_, v)| *v);
                    let curr = window[1].1.iter().find(|(s, _)| s == sector).map(|(_, v)| *v);
                    let change = match (prev, curr) {
                        (Some(p), Some(c)) if p > 0.0 => Some((c - p) / p * 100.0),
                        _ => None,
                    };
                    sector_changes.insert(window[1].0.to_string(), json!(change));
                }
                dynamics.push(json!({
                    "code": sector,
                    "label": sector_name(sector),
                    "changes": sector_changes,
                }));
            }
        }

        let wages = group_sum(
            &base,
            columns::COL_CODE,
            &FlowFilter::row_code("D11").domestic(true),
        )?;
        let consumption = group_sum(
            &base,
            columns::ROW_CODE,
            &FlowFilter::column_code("P3_S14").domestic(true),
        )?;

        result.insert(
            country.as_str().to_string(),
            json!({
                "year": year,
                "dynamics": dynamics,
                "wages_by_sector": labeled_entries(&wages, 30),
                "consumption_by_product": labeled_entries(&consumption, 30),
            }),
        );
    }
    Ok(Value::Object(result))
}

fn generate_linkages(
    store: &crate::adapters::FlowStore,
    config: &crate::config::FigaroConfig,
    countries: &[CountryCode],
    year: i32,
    summary: &mut RunSummary,
) -> crate::domain::Result<Value> {
    let top_n = config.analysis.top_n;

    let mut result: Map<String, Value> = Map::new();
    for country in countries {
        let Some(df) = store.try_load(country, year)? else {
            summary.record_partition_missing();
            continue;
        };
        summary.record_partition_read();

        // Domestic intermediate consumption: products into industries
        let intermediate = df
            .clone()
            .lazy()
            .filter(
                col(columns::ROW_CODE)
                    .str()
                    .starts_with(lit("CPA_"))
                    .and(
                        col(columns::COL_CODE)
                            .str()
                            .contains(lit(INDUSTRY_PATTERN), true),
                    )
                    .and(col(columns::ORIGIN).eq(col(columns::DECLARANT))),
            )
            .collect()?;

        let backward = group_sum(&intermediate, columns::COL_CODE, &FlowFilter::default())?;
        let forward = group_sum(
            &df,
            columns::ROW_CODE,
            &FlowFilter::default().with_row_prefix("CPA_"),
        )?;
        let flows = group_sum_pairs(&intermediate, &FlowFilter::default())?;

        let top_flows: Vec<Value> = flows
            .iter()
            .take(15)
            .map(|(from, to, value)| {
                json!({
                    "from_code": from,
                    "from_label": sector_name(from),
                    "to_code": to,
                    "to_label": sector_name(to),
                    "value": value,
                })
            })
            .collect();

        result.insert(
            country.as_str().to_string(),
            json!({
                "year": year,
                "backward": labeled_entries(&backward, top_n),
                "forward": labeled_entries(&forward, top_n),
                "top_flows": top_flows,
            }),
        );
    }
    Ok(Value::Object(result))
}

fn generate_sankey(
    store: &crate::adapters::FlowStore,
    config: &crate::config::FigaroConfig,
    countries: &[CountryCode],
    summary: &mut RunSummary,
) -> crate::domain::Result<Value> {
    let analysis = &config.analysis;
    let years = [
        analysis.reference_year,
        analysis.evaluation_year,
        analysis.evaluation_year + 2,
    ];

    let mut result: Map<String, Value> = Map::new();
    for country in countries {
        let mut country_data: Map<String, Value> = Map::new();
        for year in years {
            let Some(df) = store.try_load(country, year)? else {
                summary.record_partition_missing();
                continue;
            };
            summary.record_partition_read();

            let wages = sum_where(&df, &Metric::Wages.filter())?;
            let surplus = sum_where(&df, &Metric::OperatingSurplus.filter())?;
            let mixed = sum_where(&df, &FlowFilter::row_code("B3").domestic(true))?;
            let hh = sum_where(&df, &Metric::HouseholdConsumption.filter())?;
            let gov = sum_where(&df, &Metric::GovernmentConsumption.filter())?;
            let investment = sum_where(&df, &Metric::Investment.filter())?;
            let exports = sum_where(&df, &FlowFilter::column_code("P6"))?;
            let imports = sum_where(&df, &Metric::Imports.filter())?;

            country_data.insert(
                year.to_string(),
                json!({
                    "D11": wages,
                    "B2": surplus,
                    "B3": mixed,
                    "P3_S14": hh,
                    "P3_S13": gov,
                    "P51G": investment,
                    "net_exports": exports - imports,
                }),
            );
        }
        if !country_data.is_empty() {
            result.insert(country.as_str().to_string(), Value::Object(country_data));
        }
    }
    Ok(Value::Object(result))
}

fn generate_metadata(config: &crate::config::FigaroConfig) -> Value {
    let (codes, country_names, sectors) = label_tables();
    let to_map = |table: &[(&str, &str)]| -> Map<String, Value> {
        table
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    };

    json!({
        "codes": to_map(codes),
        "countries": to_map(country_names),
        "sectors": to_map(sectors),
        "source": "FIGARO-NAM (Eurostat)",
        "note": "All values in million EUR, nominal (not inflation-adjusted)",
        "reference_year": config.analysis.reference_year.to_string(),
        "crises": {
            "covid": {
                "year": 2020,
                "label": "COVID-19 Pandemic",
                "description": "Lockdowns led to sharp decline in household consumption"
            },
            "energy": {
                "year": 2022,
                "label": "Energy Crisis",
                "description": "Rising energy prices; nominal values overstate real growth"
            }
        }
    })
}
