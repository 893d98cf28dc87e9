//! Validate config command implementation
//!
//! Implements the `validate-config` command for checking the figaro-nam
//! configuration file before running any analysis.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Application: {}", config.application.name);
                println!("  Log Level: {}", config.application.log_level);
                println!("  Parquet Directory: {}", config.data.parquet_dir);
                println!("  Tables Directory: {}", config.output.tables_dir);
                println!("  JSON Directory: {}", config.output.json_dir);
                println!(
                    "  Focus Countries: {:?}",
                    config.analysis.focus_countries
                );
                println!(
                    "  Year Range: {}-{}",
                    config.analysis.start_year, config.analysis.end_year
                );
                println!(
                    "  Baseline Window: {}-{} (evaluated {})",
                    config.analysis.baseline_start,
                    config.analysis.baseline_end,
                    config.analysis.evaluation_year
                );
                println!("  Reference Year: {}", config.analysis.reference_year);
                println!("  Trade Year: {}", config.analysis.trade_year);
                println!(
                    "  Partner Universe: {} countries",
                    config.analysis.partner_universe.len()
                );
                match &config.deflator {
                    Some(deflator) => println!(
                        "  Deflator: custom table, {} countries, {} years",
                        deflator.indices.len(),
                        deflator.years.len()
                    ),
                    None => println!("  Deflator: built-in Eurostat HICP"),
                }
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2) // Configuration error exit code
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_creation() {
        let args = ValidateArgs {};
        let _ = format!("{args:?}");
    }

    #[test]
    fn test_validate_missing_file_is_config_error() {
        let args = ValidateArgs {};
        let code = args.execute("/nonexistent/figaro.toml").unwrap();
        assert_eq!(code, 2);
    }
}
