//! Command implementations

pub mod dashboard;
pub mod flows;
pub mod quality;
pub mod recovery;
pub mod timeseries;
pub mod trade;
pub mod trend;
pub mod validate;

use crate::adapters::FlowStore;
use crate::config::{load_config, FigaroConfig};
use crate::domain::CountryCode;

/// Exit code for configuration errors
pub(crate) const EXIT_CONFIG_ERROR: i32 = 2;
/// Exit code for fatal runtime errors
pub(crate) const EXIT_FATAL: i32 = 5;

/// Loads configuration and opens the flow store. An `Err` carries the
/// exit code the command should return.
pub(crate) fn open_context(config_path: &str) -> Result<(FigaroConfig, FlowStore), i32> {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            println!("❌ Failed to load configuration: {e}");
            return Err(EXIT_CONFIG_ERROR);
        }
    };
    let store = match FlowStore::open(&config.data.parquet_dir) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open flow store");
            println!("❌ Failed to open data store: {e}");
            return Err(EXIT_FATAL);
        }
    };
    Ok((config, store))
}

/// Resolves the set of countries a command operates on: the single
/// `--country` override when given, otherwise the configured focus list.
pub(crate) fn resolve_countries(
    config: &FigaroConfig,
    country_arg: Option<&str>,
) -> Result<Vec<CountryCode>, i32> {
    let codes: Vec<&str> = match country_arg {
        Some(code) => vec![code],
        None => config
            .analysis
            .focus_countries
            .iter()
            .map(String::as_str)
            .collect(),
    };
    codes
        .into_iter()
        .map(|code| {
            CountryCode::new(code).map_err(|e| {
                println!("❌ Invalid country code: {e}");
                EXIT_CONFIG_ERROR
            })
        })
        .collect()
}
