//! Configuration loading with environment variable substitution
//!
//! Loads the TOML configuration file, substitutes `${VAR}` references with
//! environment variable values, applies `FIGARO_*` overrides, then
//! validates the result.

use crate::config::schema::FigaroConfig;
use crate::domain::errors::FigaroError;
use crate::domain::result::Result;
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Loads configuration from a TOML file
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails
/// validation.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FigaroConfig> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading configuration");

    let content = fs::read_to_string(path).map_err(|e| {
        FigaroError::Configuration(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let substituted = substitute_env_vars(&content)?;

    let mut config: FigaroConfig = toml::from_str(&substituted)
        .map_err(|e| FigaroError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(FigaroError::Configuration)?;

    debug!(
        countries = config.analysis.focus_countries.len(),
        start_year = config.analysis.start_year,
        end_year = config.analysis.end_year,
        "Configuration loaded"
    );

    Ok(config)
}

/// Substitutes `${VAR_NAME}` patterns with environment variable values.
/// Comment lines are left untouched.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| FigaroError::Configuration(format!("Invalid regex: {e}")))?;

    let mut result = String::with_capacity(content.len());

    for line in content.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let substituted = re.replace_all(line, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| {
                debug!(var = var_name, "Environment variable not set, leaving placeholder");
                caps[0].to_string()
            })
        });

        result.push_str(&substituted);
        result.push('\n');
    }

    Ok(result)
}

/// Applies `FIGARO_*` environment overrides on top of the file values.
fn apply_env_overrides(config: &mut FigaroConfig) {
    if let Ok(dir) = env::var("FIGARO_PARQUET_DIR") {
        config.data.parquet_dir = dir;
    }
    if let Ok(dir) = env::var("FIGARO_TABLES_DIR") {
        config.output.tables_dir = dir;
    }
    if let Ok(dir) = env::var("FIGARO_JSON_DIR") {
        config.output.json_dir = dir;
    }
    if let Ok(level) = env::var("FIGARO_LOG_LEVEL") {
        config.application.log_level = level;
    }
}
