//! Configuration schema types
//!
//! Defines the TOML configuration structure. Every section carries a
//! `validate()` that is run on load, so a bad configuration fails before
//! any partition is touched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main configuration, root of the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigaroConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Input data location
    pub data: DataConfig,

    /// Output artifact locations
    #[serde(default)]
    pub output: OutputConfig,

    /// Analysis parameters (countries, years, partner universe)
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Price index override for the deflator; the built-in Eurostat HICP
    /// table is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deflator: Option<DeflatorConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FigaroConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.data.validate()?;
        self.output.validate()?;
        self.analysis.validate()?;
        if let Some(ref deflator) = self.deflator {
            deflator.validate()?;
        }
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name used in log output
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("application.name cannot be empty".to_string());
        }
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(format!(
                "application.log_level must be one of trace, debug, info, warn, error; got '{other}'"
            )),
        }
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// Input data configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root of the partitioned parquet tree (base=<year>/ctr=<country>/)
    pub parquet_dir: String,
}

impl DataConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.parquet_dir.trim().is_empty() {
            return Err("data.parquet_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Output artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for CSV tables
    #[serde(default = "default_tables_dir")]
    pub tables_dir: String,

    /// Directory for dashboard JSON files
    #[serde(default = "default_json_dir")]
    pub json_dir: String,
}

impl OutputConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.tables_dir.trim().is_empty() {
            return Err("output.tables_dir cannot be empty".to_string());
        }
        if self.json_dir.trim().is_empty() {
            return Err("output.json_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            tables_dir: default_tables_dir(),
            json_dir: default_json_dir(),
        }
    }
}

/// Analysis parameters
///
/// Defaults reproduce the published FIGARO-NAM study: eight focus
/// countries, 2010-2023 coverage, a 2010-2018 pre-COVID baseline window
/// evaluated against 2020, trade snapshots at 2019.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Countries analyzed in detail by every command
    #[serde(default = "default_focus_countries")]
    pub focus_countries: Vec<String>,

    /// First year of the dataset range (inclusive)
    #[serde(default = "default_start_year")]
    pub start_year: i32,

    /// Last year of the dataset range (inclusive)
    #[serde(default = "default_end_year")]
    pub end_year: i32,

    /// Baseline trend window start (inclusive)
    #[serde(default = "default_baseline_start")]
    pub baseline_start: i32,

    /// Baseline trend window end (inclusive)
    #[serde(default = "default_baseline_end")]
    pub baseline_end: i32,

    /// Year the baseline trend is extrapolated to and compared against
    #[serde(default = "default_evaluation_year")]
    pub evaluation_year: i32,

    /// Reference year for nominal/real indices (index = 100)
    #[serde(default = "default_reference_year")]
    pub reference_year: i32,

    /// Year used for bilateral trade snapshots
    #[serde(default = "default_trade_year")]
    pub trade_year: i32,

    /// Partner universe scanned for export reconstruction
    #[serde(default = "default_partner_universe")]
    pub partner_universe: Vec<String>,

    /// Southern country group for the recovery comparison
    #[serde(default = "default_south")]
    pub south: Vec<String>,

    /// Northern country group for the recovery comparison
    #[serde(default = "default_north")]
    pub north: Vec<String>,

    /// Number of entries kept in ranked output tables
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.focus_countries.is_empty() {
            return Err("analysis.focus_countries cannot be empty".to_string());
        }
        for code in self
            .focus_countries
            .iter()
            .chain(self.partner_universe.iter())
            .chain(self.south.iter())
            .chain(self.north.iter())
        {
            crate::domain::CountryCode::new(code.clone())
                .map_err(|e| format!("analysis country code: {e}"))?;
        }
        if self.start_year > self.end_year {
            return Err(format!(
                "analysis.start_year ({}) must not exceed end_year ({})",
                self.start_year, self.end_year
            ));
        }
        if self.baseline_start >= self.baseline_end {
            return Err("analysis baseline window must span at least one year".to_string());
        }
        if self.evaluation_year <= self.baseline_end {
            return Err("analysis.evaluation_year must follow the baseline window".to_string());
        }
        if self.top_n == 0 {
            return Err("analysis.top_n must be at least 1".to_string());
        }
        Ok(())
    }

    /// All years of the configured range, ascending.
    pub fn years(&self) -> Vec<i32> {
        (self.start_year..=self.end_year).collect()
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            focus_countries: default_focus_countries(),
            start_year: default_start_year(),
            end_year: default_end_year(),
            baseline_start: default_baseline_start(),
            baseline_end: default_baseline_end(),
            evaluation_year: default_evaluation_year(),
            reference_year: default_reference_year(),
            trade_year: default_trade_year(),
            partner_universe: default_partner_universe(),
            south: default_south(),
            north: default_north(),
            top_n: default_top_n(),
        }
    }
}

/// Price index table override, `(country, year) -> index value`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeflatorConfig {
    /// Years covered by every index series, ascending
    pub years: Vec<i32>,

    /// Per-country index values, parallel to `years`
    pub indices: BTreeMap<String, Vec<f64>>,
}

impl DeflatorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.years.is_empty() {
            return Err("deflator.years cannot be empty".to_string());
        }
        if self.years.windows(2).any(|w| w[0] >= w[1]) {
            return Err("deflator.years must be strictly ascending".to_string());
        }
        for (country, series) in &self.indices {
            if series.len() != self.years.len() {
                return Err(format!(
                    "deflator.indices.{country} has {} values for {} years",
                    series.len(),
                    self.years.len()
                ));
            }
            if series.iter().any(|v| *v <= 0.0) {
                return Err(format!(
                    "deflator.indices.{country} contains a non-positive index value"
                ));
            }
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy: daily or hourly
    #[serde(default = "default_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path required when local_enabled = true".to_string());
        }
        match self.local_rotation.as_str() {
            "daily" | "hourly" => Ok(()),
            other => Err(format!(
                "logging.local_rotation must be 'daily' or 'hourly'; got '{other}'"
            )),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
        }
    }
}

fn default_app_name() -> String {
    "figaro-nam".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_tables_dir() -> String {
    "outputs/tables".to_string()
}

fn default_json_dir() -> String {
    "docs/data".to_string()
}

fn default_focus_countries() -> Vec<String> {
    ["DE", "FR", "IT", "ES", "AT", "PL", "GR", "NL"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_start_year() -> i32 {
    2010
}

fn default_end_year() -> i32 {
    2023
}

fn default_baseline_start() -> i32 {
    2010
}

fn default_baseline_end() -> i32 {
    2018
}

fn default_evaluation_year() -> i32 {
    2020
}

fn default_reference_year() -> i32 {
    2019
}

fn default_trade_year() -> i32 {
    2019
}

fn default_partner_universe() -> Vec<String> {
    [
        "AT", "BE", "BG", "CY", "CZ", "DK", "EE", "ES", "FI", "FR", "GR", "HR", "HU", "IE", "IT",
        "LT", "LU", "LV", "MT", "NL", "PL", "PT", "RO", "SE", "SI", "SK", "US", "CN", "JP", "GB",
        "CH",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_south() -> Vec<String> {
    ["ES", "IT", "GR", "PT"].iter().map(|s| s.to_string()).collect()
}

fn default_north() -> Vec<String> {
    ["DE", "AT", "NL"].iter().map(|s| s.to_string()).collect()
}

fn default_top_n() -> usize {
    20
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}
