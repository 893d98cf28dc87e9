//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for figaro-nam using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// figaro-nam - FIGARO national accounts exploration toolkit
#[derive(Parser, Debug)]
#[command(name = "figaro-nam")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "figaro.toml", env = "FIGARO_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FIGARO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Data quality report: coverage, distributions, code categories
    Quality(commands::quality::QualityArgs),

    /// Top flows and key aggregates for one year
    Flows(commands::flows::FlowsArgs),

    /// Per-country time series and year-over-year changes
    Timeseries(commands::timeseries::TimeseriesArgs),

    /// Pre-crisis baseline trend and deviation analysis
    Trend(commands::trend::TrendArgs),

    /// Bilateral trade reconstruction and balances
    Trade(commands::trade::TradeArgs),

    /// Nominal vs. real recovery comparison across country groups
    Recovery(commands::recovery::RecoveryArgs),

    /// Generate dashboard JSON artifacts
    Dashboard(commands::dashboard::DashboardArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_quality() {
        let cli = Cli::parse_from(["figaro-nam", "quality"]);
        assert_eq!(cli.config, "figaro.toml");
        assert!(matches!(cli.command, Commands::Quality(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["figaro-nam", "--config", "custom.toml", "timeseries"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Timeseries(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["figaro-nam", "--log-level", "debug", "trend"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_trade_with_args() {
        let cli = Cli::parse_from(["figaro-nam", "trade", "--country", "DE", "--year", "2019"]);
        match cli.command {
            Commands::Trade(args) => {
                assert_eq!(args.country, Some("DE".to_string()));
                assert_eq!(args.year, Some(2019));
            }
            _ => panic!("expected trade command"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["figaro-nam", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_dashboard() {
        let cli = Cli::parse_from(["figaro-nam", "dashboard"]);
        assert!(matches!(cli.command, Commands::Dashboard(_)));
    }
}
